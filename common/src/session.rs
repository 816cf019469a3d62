//! 解析リクエストの状態管理
//!
//! 画像の選択・送信・完了を一つのセッションで扱う。
//! - 画像を選び直すと前回の結果とエラーは消える
//! - 送信中は二重送信できない
//! - 画像が差し替えられた後に届いたレスポンスは捨てる

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, ImageSource};

/// リクエストの状態
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Pending => "pending",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

/// 送信開始時に発行される引換券
///
/// 完了時にセッションへ返す。世代が一致しなければ結果は反映されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
    fingerprint: String,
}

impl SubmitTicket {
    /// 送信した画像のフィンガープリント
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// 完了処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// 画像の差し替え等で古くなったため破棄
    Stale,
}

/// 解析フローのセッション
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    source: Option<ImageSource>,
    /// 選択時に一度だけ作るプレビュー用Data URL
    preview: Option<String>,
    state: RequestState,
    generation: u64,
    in_flight: Option<u64>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// 送信中のリクエストがあるか
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 送信ボタンを有効にしてよいか
    pub fn can_submit(&self) -> bool {
        self.source.is_some() && !self.is_in_flight()
    }

    /// 画像を選択（前回の結果・エラーは破棄）
    pub fn select_source(&mut self, source: ImageSource) {
        self.preview = Some(source.to_data_url());
        self.source = Some(source);
        self.invalidate();
    }

    /// 送信中のリクエストと結果をすべて無効化
    ///
    /// 送信中のレスポンスは後で届いても反映されない。
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.state = RequestState::Idle;
    }

    /// 送信開始
    ///
    /// 画像未選択なら `NoImageSelected`、送信中なら `RequestInFlight`。
    /// どちらの場合も状態は変わらず、通信も行われない。
    pub fn begin_submit(&mut self) -> Result<(SubmitTicket, ImageSource)> {
        if self.is_in_flight() {
            return Err(Error::RequestInFlight);
        }
        let source = self.source.clone().ok_or(Error::NoImageSelected)?;

        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.state = RequestState::Pending;

        let ticket = SubmitTicket {
            generation: self.generation,
            fingerprint: source.fingerprint(),
        };
        Ok((ticket, source))
    }

    /// 送信完了
    ///
    /// 引換券が現在の世代と一致する場合のみ状態を更新する。
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: SubmitTicket,
        outcome: std::result::Result<AnalysisResult, E>,
    ) -> Completion {
        if self.in_flight != Some(ticket.generation) || self.generation != ticket.generation {
            return Completion::Stale;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(result) => RequestState::Succeeded(result),
            Err(e) => RequestState::Failed(e.to_string()),
        };
        Completion::Applied
    }
}
