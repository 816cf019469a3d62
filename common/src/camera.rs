//! カメラリソースのスコープ管理
//!
//! 取得したトラックは `CameraSession` が所有し、
//! 明示的なクローズ・撮影・破棄（Drop）のいずれでも必ず停止する。

use crate::types::ImageSource;

/// カメラのトラック（ブラウザの MediaStreamTrack など）
pub trait MediaTrack {
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// カメラ利用中のセッション
#[derive(Debug)]
pub struct CameraSession<T: MediaTrack> {
    tracks: Vec<T>,
}

impl<T: MediaTrack> CameraSession<T> {
    pub fn new(tracks: Vec<T>) -> Self {
        Self { tracks }
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// 撮影して解放
    ///
    /// `grab` は現在のフレームをJPEGで返す。成否にかかわらずトラックは停止する。
    pub fn capture<F, E>(mut self, grab: F) -> Result<ImageSource, E>
    where
        F: FnOnce(&[T]) -> Result<Vec<u8>, E>,
    {
        let frame = grab(&self.tracks);
        self.stop_all();
        frame.map(ImageSource::from_camera_frame)
    }

    /// 明示的に閉じる
    pub fn close(mut self) {
        self.stop_all();
    }

    fn stop_all(&mut self) {
        for track in &mut self.tracks {
            if track.is_live() {
                track.stop();
            }
        }
    }
}

impl<T: MediaTrack> Drop for CameraSession<T> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// カメラ起動要求の世代管理
///
/// 許可待ちの間に閉じる・別の画像を選ぶと要求は取り消され、
/// 後から許可が下りてもそのカメラは使わない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraGate {
    generation: u64,
    opening: Option<u64>,
}

impl CameraGate {
    /// 起動要求を開始。すでに許可待ちなら `None`
    pub fn begin_open(&mut self) -> Option<u64> {
        if self.opening.is_some() {
            return None;
        }
        self.generation += 1;
        self.opening = Some(self.generation);
        Some(self.generation)
    }

    pub fn is_opening(&self) -> bool {
        self.opening.is_some()
    }

    /// 許可（または拒否）が返ってきた時点で、その要求がまだ有効か
    pub fn finish_open(&mut self, ticket: u64) -> bool {
        if self.opening != Some(ticket) {
            return false;
        }
        self.opening = None;
        true
    }

    /// 許可待ちの要求を取り消す
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.opening = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 取得・停止を記録するテスト用トラック
    struct FakeTrack {
        id: usize,
        live: bool,
        stopped: Rc<RefCell<Vec<usize>>>,
    }

    impl MediaTrack for FakeTrack {
        fn stop(&mut self) {
            self.live = false;
            self.stopped.borrow_mut().push(self.id);
        }

        fn is_live(&self) -> bool {
            self.live
        }
    }

    fn acquire(count: usize) -> (CameraSession<FakeTrack>, Rc<RefCell<Vec<usize>>>) {
        let stopped = Rc::new(RefCell::new(Vec::new()));
        let tracks = (0..count)
            .map(|id| FakeTrack { id, live: true, stopped: stopped.clone() })
            .collect();
        (CameraSession::new(tracks), stopped)
    }

    #[test]
    fn test_close_stops_all_tracks() {
        let (session, stopped) = acquire(2);
        assert_eq!(session.live_track_count(), 2);

        session.close();
        assert_eq!(*stopped.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_drop_stops_all_tracks() {
        let (session, stopped) = acquire(3);
        drop(session);
        assert_eq!(stopped.borrow().len(), 3);
    }

    #[test]
    fn test_capture_stops_tracks_and_returns_source() {
        let (session, stopped) = acquire(1);
        let source = session
            .capture(|tracks| {
                assert_eq!(tracks.len(), 1);
                Ok::<_, String>(vec![0xFF, 0xD8])
            })
            .unwrap();

        assert_eq!(source.mime_type, "image/jpeg");
        assert_eq!(source.bytes, vec![0xFF, 0xD8]);
        assert_eq!(*stopped.borrow(), vec![0]);
    }

    #[test]
    fn test_failed_capture_still_releases() {
        let (session, stopped) = acquire(2);
        let result = session.capture(|_| Err::<Vec<u8>, _>("video not ready"));

        assert_eq!(result.unwrap_err(), "video not ready");
        assert_eq!(stopped.borrow().len(), 2);
    }

    #[test]
    fn test_each_track_stopped_once() {
        let (session, stopped) = acquire(2);
        // close と Drop の両方を通っても停止は1回
        session.close();
        assert_eq!(stopped.borrow().len(), 2);
    }

    #[test]
    fn test_already_ended_track_not_stopped_again() {
        let stopped = Rc::new(RefCell::new(Vec::new()));
        let tracks = vec![
            FakeTrack { id: 0, live: false, stopped: stopped.clone() },
            FakeTrack { id: 1, live: true, stopped: stopped.clone() },
        ];
        let session = CameraSession::new(tracks);
        assert_eq!(session.live_track_count(), 1);

        drop(session);
        assert_eq!(*stopped.borrow(), vec![1]);
    }

    #[test]
    fn test_gate_open_flow() {
        let mut gate = CameraGate::default();
        let ticket = gate.begin_open().unwrap();
        assert!(gate.is_opening());
        // 許可待ち中の二重起動は不可
        assert!(gate.begin_open().is_none());

        assert!(gate.finish_open(ticket));
        assert!(!gate.is_opening());
    }

    #[test]
    fn test_gate_cancel_while_waiting_for_permission() {
        let mut gate = CameraGate::default();
        let ticket = gate.begin_open().unwrap();

        gate.cancel();
        assert!(!gate.is_opening());

        // 取り消し後に許可が下りても使わない
        assert!(!gate.finish_open(ticket));
    }

    #[test]
    fn test_gate_late_ticket_does_not_clear_newer_request() {
        let mut gate = CameraGate::default();
        let old = gate.begin_open().unwrap();
        gate.cancel();
        let new = gate.begin_open().unwrap();

        assert!(!gate.finish_open(old));
        assert!(gate.is_opening());
        assert!(gate.finish_open(new));
    }
}
