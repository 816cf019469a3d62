//! 解析フローの実行
//!
//! セッションに画像を選択し、送信し、完了を反映する。
//! 複数画像は1枚ずつ順に処理するので、同時に送信中のリクエストは常に1つ以下。

use crate::client::PredictTransport;
use crate::report::{self, ReportEntry};
use crate::scanner;
use indicatif::{ProgressBar, ProgressStyle};
use skin_analyzer_common::{AnalysisSession, Completion, ImageSource, RequestState};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Analyzer<T: PredictTransport> {
    transport: T,
    session: AnalysisSession,
    show_progress: bool,
}

impl<T: PredictTransport> Analyzer<T> {
    pub fn new(transport: T, show_progress: bool) -> Self {
        Self {
            transport,
            session: AnalysisSession::new(),
            show_progress,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn select(&mut self, source: ImageSource) {
        self.session.select_source(source);
    }

    /// 選択中の画像を送信し、完了後の状態を返す
    ///
    /// 画像未選択・送信中の場合は通信せずにエラー。
    pub async fn submit(&mut self) -> skin_analyzer_common::Result<RequestState> {
        let (ticket, source) = self.session.begin_submit()?;
        log::info!("送信: {} (sha256 {})", source.file_name, ticket.fingerprint());

        let spinner = self.spinner(&source.file_name);
        let outcome = self.transport.predict(&source).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        if let Err(e) = &outcome {
            log::warn!("解析失敗 {}: {}", source.file_name, e);
        }

        if self.session.complete(ticket, outcome) == Completion::Stale {
            log::warn!("古いレスポンスを破棄: {}", source.file_name);
        }

        Ok(self.session.state().clone())
    }

    /// ファイルを読み込んで解析し、レポートのエントリを返す
    pub async fn analyze_path(&mut self, path: &Path) -> ReportEntry {
        let source = match scanner::load_source(path) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("読み込み失敗 {}: {}", path.display(), e);
                return ReportEntry::failed(path, e.to_string());
            }
        };

        self.select(source.clone());
        match self.submit().await {
            Ok(state) => ReportEntry::from_state(path, &source, &state),
            Err(e) => ReportEntry::failed(path, e.to_string()),
        }
    }

    /// 複数ファイルを順に解析
    ///
    /// `save_images_dir` があればマスク/オーバーレイを保存する。
    pub async fn analyze_paths(
        &mut self,
        paths: &[PathBuf],
        save_images_dir: Option<&Path>,
        mut on_entry: impl FnMut(&ReportEntry),
    ) -> Vec<ReportEntry> {
        let mut entries = Vec::with_capacity(paths.len());

        for path in paths {
            let mut entry = self.analyze_path(path).await;

            if let Some(dir) = save_images_dir {
                if let Err(e) = report::save_images(&mut entry, dir) {
                    log::warn!("画像保存失敗 {}: {}", entry.file_name, e);
                }
            }

            on_entry(&entry);
            entries.push(entry);
        }

        entries
    }

    fn spinner(&self, file_name: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
            pb.set_style(style);
        }
        pb.set_message(format!("Analyzing {}...", file_name));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}
