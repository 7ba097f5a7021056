//! # Upload Session
//!
//! The user-facing side of an exchange. A session owns two slots, the pending
//! selection and the current result, and moves through:
//!
//! ```text
//! NoImageSelected --select--> ImageSelected --submit ok--> ResultAvailable
//!                                          \--submit err-> ErrorNotified
//! ```
//!
//! Once a result exists an image is always selected too, so `ResultAvailable`
//! also stands for "image selected, result available": selecting again while a
//! result is held stays in `ResultAvailable`.
//!
//! Both slots are replaced wholesale. Selecting a new image never clears the
//! current result; only a successful submission does, by replacing it.
//!
//! User notices go through a [`Notifier`], results through a [`ResultView`].
//! Closures implement both, which is what the tests use.

use log::{error, info, warn};

use crate::client::client::ExchangeClient;
use crate::client::image::{ProcessedImage, SourceImage};
use crate::error::{ExchangeError, Result};

/// Notice shown when submit is attempted without a selection.
pub const MISSING_SELECTION_NOTICE: &str = "Please select an image.";

/// Notice shown for every failed exchange, whatever the cause.
pub const FAILURE_NOTICE: &str = "Error processing image.";

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn alert(&self, message: &str) {
        self(message)
    }
}

/// Receives each new result as it replaces the previous one.
pub trait ResultView: Send {
    fn show(&mut self, image: &ProcessedImage);
}

impl<F> ResultView for F
where
    F: FnMut(&ProcessedImage) + Send,
{
    fn show(&mut self, image: &ProcessedImage) {
        self(image)
    }
}

/// Where the session is in the select/submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoImageSelected,
    /// An image is pending and no result is held.
    ImageSelected,
    /// An image is selected and a result is held.
    ResultAvailable,
    /// The last submission failed. Any earlier result is still held.
    ErrorNotified,
}

/// Single-owner state for one user's exchanges.
pub struct UploadSession<N, V> {
    client: ExchangeClient,
    notifier: N,
    view: V,
    selected: Option<SourceImage>,
    result: Option<ProcessedImage>,
    state: SessionState,
}

impl<N, V> UploadSession<N, V>
where
    N: Notifier,
    V: ResultView,
{
    pub fn new(client: ExchangeClient, notifier: N, view: V) -> Self {
        Self {
            client,
            notifier,
            view,
            selected: None,
            result: None,
            state: SessionState::NoImageSelected,
        }
    }

    /// Makes `image` the pending selection, replacing any previous one.
    pub fn select_image(&mut self, image: SourceImage) {
        info!("🖼️  Selected {} ({} bytes)", image.file_name(), image.len());
        self.selected = Some(image);
        self.state = if self.result.is_some() {
            SessionState::ResultAvailable
        } else {
            SessionState::ImageSelected
        };
    }

    /// Uploads the pending selection and stores the result.
    ///
    /// Without a selection this alerts [`MISSING_SELECTION_NOTICE`] and returns
    /// [`ExchangeError::MissingSelection`] without touching the network. Any
    /// exchange failure is logged, alerted once as [`FAILURE_NOTICE`] and
    /// returned; the previous result stays in place.
    pub async fn submit_image(&mut self) -> Result<&ProcessedImage> {
        let Some(source) = self.selected.as_ref() else {
            warn!("⚠️  Submit attempted with no image selected");
            self.notifier.alert(MISSING_SELECTION_NOTICE);
            return Err(ExchangeError::MissingSelection);
        };

        match self.client.exchange(source).await {
            Ok(processed) => {
                self.view.show(&processed);
                self.state = SessionState::ResultAvailable;
                Ok(&*self.result.insert(processed))
            }
            Err(e) => {
                error!("❌ Error processing image: {}", e);
                self.notifier.alert(FAILURE_NOTICE);
                self.state = SessionState::ErrorNotified;
                Err(e)
            }
        }
    }

    pub fn selected_image(&self) -> Option<&SourceImage> {
        self.selected.as_ref()
    }

    /// The current result, if any exchange has succeeded yet.
    pub fn processed_image(&self) -> Option<&ProcessedImage> {
        self.result.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn client(&self) -> &ExchangeClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::EndpointConfig;
    use std::sync::{Arc, Mutex};

    fn recording_session() -> (
        UploadSession<impl Notifier, impl ResultView>,
        Arc<Mutex<Vec<String>>>,
        Arc<Mutex<Vec<String>>>,
    ) {
        let alerts = Arc::new(Mutex::new(Vec::new()));
        let shown = Arc::new(Mutex::new(Vec::new()));

        let alerts_sink = alerts.clone();
        let shown_sink = shown.clone();
        // Nothing listens on port 9; any request would fail fast.
        let endpoint = EndpointConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..EndpointConfig::default()
        };
        let session = UploadSession::new(
            ExchangeClient::new(endpoint),
            move |message: &str| alerts_sink.lock().unwrap().push(message.to_string()),
            move |image: &ProcessedImage| shown_sink.lock().unwrap().push(image.source()),
        );

        (session, alerts, shown)
    }

    #[test]
    fn test_initial_state() {
        let (session, _, _) = recording_session();
        assert_eq!(session.state(), SessionState::NoImageSelected);
        assert!(session.selected_image().is_none());
        assert!(session.processed_image().is_none());
    }

    #[tokio::test]
    async fn test_submit_without_selection() {
        let (mut session, alerts, shown) = recording_session();

        let err = session.submit_image().await.unwrap_err();

        assert!(matches!(err, ExchangeError::MissingSelection));
        assert_eq!(*alerts.lock().unwrap(), vec![MISSING_SELECTION_NOTICE.to_string()]);
        assert!(shown.lock().unwrap().is_empty());
        assert_eq!(session.state(), SessionState::NoImageSelected);
    }

    #[test]
    fn test_select_replaces_pending_selection() {
        let (mut session, _, _) = recording_session();

        session.select_image(SourceImage::new("first.png", vec![1, 2, 3]));
        session.select_image(SourceImage::new("second.png", vec![4, 5]));

        let selected = session.selected_image().unwrap();
        assert_eq!(selected.file_name(), "second.png");
        assert_eq!(&selected.bytes()[..], &[4u8, 5]);
        assert_eq!(session.state(), SessionState::ImageSelected);
    }

    #[tokio::test]
    async fn test_transport_failure_alerts_once() {
        let (mut session, alerts, shown) = recording_session();
        session.select_image(SourceImage::new("photo.jpg", vec![0xFF, 0xD8, 0xFF]));

        let err = session.submit_image().await.unwrap_err();

        assert!(err.is_exchange_failure());
        assert_eq!(*alerts.lock().unwrap(), vec![FAILURE_NOTICE.to_string()]);
        assert!(shown.lock().unwrap().is_empty());
        assert!(session.processed_image().is_none());
        assert_eq!(session.state(), SessionState::ErrorNotified);
    }
}
