use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    api::SuggestionApi,
    form::{SubmitStatus, SuggestionForm},
    suggestion::{normalize_record, NewSuggestion, Suggestion},
};

/// Whether the list has been filled from the retrieval endpoint yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Initial,
    Loaded,
}

/// Client side state of the site: the local mirror of suggestions and the
/// form with its submission status.
///
/// The mirror is only ever read from the server once. New suggestions are
/// prepended locally after a successful submit and likes never leave the
/// process, so both are gone after a reload.
pub struct SiteController<A: SuggestionApi> {
    api: A,
    suggestions: Vec<Suggestion>,
    list_state: ListState,
    form: SuggestionForm,
    form_visible: bool,
    status: SubmitStatus,
    success_delay: Duration,
    close_at: Option<Instant>,
}

impl<A: SuggestionApi> SiteController<A> {
    pub fn new(api: A, success_delay: Duration) -> Self {
        Self {
            api,
            suggestions: Vec::new(),
            list_state: ListState::Initial,
            form: SuggestionForm::new(),
            form_visible: false,
            status: SubmitStatus::Idle,
            success_delay,
            close_at: None,
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn list_state(&self) -> ListState {
        self.list_state
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn form(&self) -> &SuggestionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SuggestionForm {
        &mut self.form
    }

    pub fn is_form_visible(&self) -> bool {
        self.form_visible
    }

    pub fn total_likes(&self) -> u64 {
        self.suggestions.iter().map(|s| u64::from(s.likes)).sum()
    }

    /// Fetches the list once. Failures are logged and leave the list empty.
    pub async fn load(&mut self) {
        match self.api.fetch_suggestions().await {
            Ok(records) => {
                let now = Utc::now();
                self.suggestions = records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| normalize_record(record, index, now))
                    .collect();
                self.list_state = ListState::Loaded;
                info!(count = self.suggestions.len(), "Loaded suggestions");
            }
            Err(error) => warn!("Error loading suggestions: {error}"),
        }
    }

    pub fn open_form(&mut self) {
        self.form_visible = true;
    }

    pub fn close_form(&mut self) {
        self.form_visible = false;
        self.close_at = None;
        if self.status != SubmitStatus::Submitting {
            self.status = SubmitStatus::Idle;
        }
    }

    /// Sends the form. Does nothing when a required field is empty or a
    /// submission is already running.
    pub async fn submit(&mut self) {
        if let Some(payload) = self.begin_submit() {
            self.send_submission(payload).await;
        }
    }

    /// Enters `Submitting` and hands back the payload to send, or `None` when
    /// the form may not be submitted right now.
    pub fn begin_submit(&mut self) -> Option<NewSuggestion> {
        if !self.form.can_submit(self.status) {
            return None;
        }

        self.status = SubmitStatus::Submitting;
        Some(self.form.to_payload())
    }

    pub async fn send_submission(&mut self, payload: NewSuggestion) {
        if let Err(error) = self.api.submit_suggestion(&payload).await {
            warn!("Error submitting suggestion: {error}");
            self.status = SubmitStatus::Error;
            return;
        }

        let now = Utc::now();
        let field = |value: Option<String>| value.unwrap_or_default();
        let suggestion = Suggestion {
            id: now.timestamp_millis().to_string(),
            song1: field(payload.song1),
            artist1: field(payload.artist1),
            song2: field(payload.song2),
            artist2: field(payload.artist2),
            suggester_name: field(payload.suggester_name),
            suggester_email: field(payload.suggester_email),
            reason: field(payload.reason),
            timestamp: now,
            likes: 0,
        };

        self.suggestions.insert(0, suggestion);
        self.form.clear_all_boxes();
        self.status = SubmitStatus::Success;
        self.close_at = Some(Instant::now() + self.success_delay);
    }

    /// Closes the form once the success banner has been up long enough.
    pub fn tick(&mut self, now: Instant) {
        if self.close_at.is_some_and(|deadline| now >= deadline) {
            self.close_at = None;
            self.form_visible = false;
            self.status = SubmitStatus::Idle;
        }
    }

    /// Adds one like to the suggestion with `id`, locally only.
    pub fn like(&mut self, id: &str) -> bool {
        match self.suggestions.iter_mut().find(|s| s.id == id) {
            Some(suggestion) => {
                suggestion.likes = suggestion.likes.saturating_add(1);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::{error::NetworkError, form::FormField};

    /// Canned answers plus a record of every call.
    #[derive(Clone, Default)]
    pub(crate) struct MockApi {
        pub records: Option<Vec<Value>>,
        pub fail_submit: bool,
        pub fetches: Arc<AtomicUsize>,
        pub submitted: Arc<Mutex<Vec<NewSuggestion>>>,
    }

    #[async_trait]
    impl SuggestionApi for MockApi {
        async fn fetch_suggestions(&self) -> Result<Vec<Value>, NetworkError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.records.clone().ok_or(NetworkError::Status {
                status: 500,
                message: "Query failed".into(),
            })
        }

        async fn submit_suggestion(&self, suggestion: &NewSuggestion) -> Result<Value, NetworkError> {
            self.submitted.lock().unwrap().push(suggestion.clone());
            if self.fail_submit {
                return Err(NetworkError::Status {
                    status: 500,
                    message: "Insert failed".into(),
                });
            }
            Ok(json!({ "success": true, "inserted": [] }))
        }
    }

    fn record(id: u64, likes: u32) -> Value {
        json!({
            "id": id,
            "song1": format!("song {id}"),
            "artist1": "artist",
            "suggester_name": "sam",
            "timestamp": "2025-01-01T00:00:00Z",
            "likes": likes
        })
    }

    fn fill_required(controller: &mut SiteController<MockApi>, song: &str) {
        let form = controller.form_mut();
        form.set_field(FormField::Song1, song);
        form.set_field(FormField::Artist1, "Dua Lipa");
        form.set_field(FormField::SuggesterName, "Alex");
    }

    #[tokio::test]
    async fn load_replaces_list() {
        let api = MockApi {
            records: Some(vec![record(2, 1), record(1, 4)]),
            ..Default::default()
        };
        let mut controller = SiteController::new(api, Duration::ZERO);
        assert_eq!(controller.list_state(), ListState::Initial);

        controller.load().await;
        assert_eq!(controller.list_state(), ListState::Loaded);
        assert_eq!(controller.suggestions().len(), 2);
        assert_eq!(controller.suggestions()[0].id, "2");
        assert_eq!(controller.total_likes(), 5);
    }

    #[tokio::test]
    async fn load_of_empty_store_is_loaded_and_empty() {
        let api = MockApi {
            records: Some(vec![]),
            ..Default::default()
        };
        let mut controller = SiteController::new(api, Duration::ZERO);
        controller.load().await;
        assert_eq!(controller.list_state(), ListState::Loaded);
        assert!(controller.suggestions().is_empty());
    }

    #[tokio::test]
    async fn failed_load_leaves_list_empty() {
        let api = MockApi::default();
        let fetches = api.fetches.clone();
        let mut controller = SiteController::new(api, Duration::ZERO);

        controller.load().await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(controller.list_state(), ListState::Initial);
        assert!(controller.suggestions().is_empty());
    }

    #[tokio::test]
    async fn successful_submit_prepends_and_clears() {
        let api = MockApi {
            records: Some(vec![record(1, 2)]),
            ..Default::default()
        };
        let submitted = api.submitted.clone();
        let mut controller = SiteController::new(api, Duration::from_secs(2));
        controller.load().await;
        controller.open_form();
        fill_required(&mut controller, "Levitating");

        controller.submit().await;

        assert_eq!(controller.status(), SubmitStatus::Success);
        assert_eq!(submitted.lock().unwrap().len(), 1);
        let first = &controller.suggestions()[0];
        assert_eq!(first.song1, "Levitating");
        assert_eq!(first.suggester_name, "Alex");
        assert_eq!(first.likes, 0);
        assert_eq!(controller.suggestions().len(), 2);
        assert!(!controller.form().is_valid());
        assert!(controller.is_form_visible());
    }

    #[tokio::test]
    async fn success_banner_closes_after_delay() {
        let mut controller = SiteController::new(MockApi::default(), Duration::from_secs(2));
        controller.open_form();
        fill_required(&mut controller, "Levitating");
        controller.submit().await;

        controller.tick(Instant::now());
        assert!(controller.is_form_visible());
        assert_eq!(controller.status(), SubmitStatus::Success);

        controller.tick(Instant::now() + Duration::from_secs(3));
        assert!(!controller.is_form_visible());
        assert_eq!(controller.status(), SubmitStatus::Idle);
    }

    #[tokio::test]
    async fn incomplete_form_makes_no_call() {
        let api = MockApi::default();
        let submitted = api.submitted.clone();
        let mut controller = SiteController::new(api, Duration::ZERO);
        fill_required(&mut controller, "");

        controller.submit().await;

        assert!(submitted.lock().unwrap().is_empty());
        assert_eq!(controller.status(), SubmitStatus::Idle);
        assert!(controller.suggestions().is_empty());
    }

    #[tokio::test]
    async fn only_one_submission_in_flight() {
        let mut controller = SiteController::new(MockApi::default(), Duration::ZERO);
        fill_required(&mut controller, "Levitating");

        let payload = controller.begin_submit();
        assert!(payload.is_some());
        assert_eq!(controller.status(), SubmitStatus::Submitting);
        assert!(controller.begin_submit().is_none());

        controller.close_form();
        assert_eq!(controller.status(), SubmitStatus::Submitting);
    }

    #[tokio::test]
    async fn failed_submit_sets_error_and_keeps_form() {
        let api = MockApi {
            fail_submit: true,
            ..Default::default()
        };
        let mut controller = SiteController::new(api, Duration::ZERO);
        controller.open_form();
        fill_required(&mut controller, "Levitating");

        controller.submit().await;

        assert_eq!(controller.status(), SubmitStatus::Error);
        assert!(controller.suggestions().is_empty());
        assert_eq!(controller.form().field(FormField::Song1).get_input(), "Levitating");
    }

    #[tokio::test]
    async fn like_touches_only_its_record() {
        let api = MockApi {
            records: Some(vec![record(1, 4), record(2, 0)]),
            ..Default::default()
        };
        let mut controller = SiteController::new(api, Duration::ZERO);
        controller.load().await;

        assert!(controller.like("1"));
        assert_eq!(controller.suggestions()[0].likes, 5);
        assert_eq!(controller.suggestions()[1].likes, 0);
        assert!(!controller.like("missing"));
    }

    #[tokio::test]
    async fn likes_are_lost_on_reload() {
        let api = MockApi {
            records: Some(vec![record(1, 4)]),
            ..Default::default()
        };
        let mut controller = SiteController::new(api.clone(), Duration::ZERO);
        controller.load().await;
        controller.like("1");
        assert_eq!(controller.total_likes(), 5);

        let mut reloaded = SiteController::new(api, Duration::ZERO);
        reloaded.load().await;
        assert_eq!(reloaded.total_likes(), 4);
    }
}
