//! Turn-by-turn classification state machine.
//!
//! The machine is split into synchronous steps so every transition can be
//! exercised without I/O:
//!
//! - [`ClassificationSession::begin_start`] / [`ClassificationSession::begin_answer`]
//!   move into `Loading`, build the outbound request and hand back a
//!   [`Ticket`] tagged with the current epoch.
//! - [`ClassificationSession::apply`] folds the response (or failure) for a
//!   ticket into the next state. Tickets from a superseded epoch are ignored.
//!
//! [`ClassificationSession::start`] and [`ClassificationSession::submit_answer`]
//! chain both steps around a [`ClassifierApi`] call.

use tracing::{debug, info, warn};

use super::headings::select_heading;
use super::model::{
    AnswerValue, ClassifyResponse, ContinueRequest, Interaction, InteractionOption,
    KnownCharacteristic, PotentialHeading, StartRequest,
};
use crate::config::VendorProfile;
use crate::error::{ApiError, ClassifyError};
use crate::ports::ClassifierApi;

/// Where a classification session currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing started yet, or reset.
    #[default]
    Idle,
    /// Exactly one request is in flight.
    Loading,
    /// Waiting for the user to answer `question`.
    Questioning {
        /// The question to answer.
        question: Interaction,
        /// Answers given so far.
        known: Vec<KnownCharacteristic>,
    },
    /// An HS code was resolved.
    Complete {
        /// The resolved code.
        hs_code: String,
        /// Candidates the vendor offered alongside it.
        potential_headings: Vec<PotentialHeading>,
        /// Answers given on the way.
        known: Vec<KnownCharacteristic>,
    },
    /// The last turn failed. Recover with `reset` or a fresh start.
    Errored(ClassifyError),
}

impl SessionState {
    /// Short lowercase name, for logs and prompts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Questioning { .. } => "questioning",
            Self::Complete { .. } => "complete",
            Self::Errored(_) => "error",
        }
    }

    /// Human-readable error, when errored.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Errored(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

/// Handle for one outbound request; pass it back to [`ClassificationSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    epoch: u64,
}

impl Ticket {
    /// Epoch the request was issued under.
    #[must_use]
    pub fn epoch(self) -> u64 {
        self.epoch
    }
}

/// Outcome of [`ClassificationSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response drove a transition.
    Transitioned,
    /// The response belonged to a superseded request and was dropped.
    Stale,
}

#[derive(Debug, Clone)]
struct InFlight {
    epoch: u64,
    answered_question: Option<String>,
}

/// One live classification dialogue.
#[derive(Debug, Clone)]
pub struct ClassificationSession {
    lang: String,
    profile: VendorProfile,
    transaction_id: Option<String>,
    product_description: String,
    state: SessionState,
    epoch: u64,
    in_flight: Option<InFlight>,
}

impl Default for ClassificationSession {
    fn default() -> Self {
        Self::new("en", VendorProfile::default())
    }
}

impl ClassificationSession {
    /// Creates an idle session that sends `lang` and `profile` with every request.
    #[must_use]
    pub fn new(lang: impl Into<String>, profile: VendorProfile) -> Self {
        Self {
            lang: lang.into(),
            profile,
            transaction_id: None,
            product_description: String::new(),
            state: SessionState::Idle,
            epoch: 0,
            in_flight: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Vendor transaction id, once a start response arrived.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Description the session was started with.
    #[must_use]
    pub fn product_description(&self) -> &str {
        &self.product_description
    }

    /// Current epoch. Bumped by every start and reset.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The question awaiting an answer.
    #[must_use]
    pub fn current_question(&self) -> Option<&Interaction> {
        match &self.state {
            SessionState::Questioning { question, .. } => Some(question),
            _ => None,
        }
    }

    /// Answers given so far.
    #[must_use]
    pub fn known_characteristics(&self) -> &[KnownCharacteristic] {
        match &self.state {
            SessionState::Questioning { known, .. } | SessionState::Complete { known, .. } => known,
            _ => &[],
        }
    }

    /// The resolved HS code.
    #[must_use]
    pub fn hs_code(&self) -> Option<&str> {
        match &self.state {
            SessionState::Complete { hs_code, .. } => Some(hs_code),
            _ => None,
        }
    }

    /// Enters `Loading` for a new product description.
    ///
    /// Supersedes anything in flight: a late response to an earlier request
    /// is dropped by [`Self::apply`].
    pub fn begin_start(&mut self, description: &str) -> (Ticket, StartRequest) {
        self.epoch += 1;
        self.transaction_id = None;
        self.product_description = description.to_string();
        self.state = SessionState::Loading;
        self.in_flight = Some(InFlight { epoch: self.epoch, answered_question: None });
        debug!(epoch = self.epoch, "classification start dispatched");

        let request = StartRequest::new(description, &self.lang, &self.profile);
        (Ticket { epoch: self.epoch }, request)
    }

    /// Enters `Loading` to answer the current question with `option`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidLocalState`], and moves to `Errored`,
    /// when there is no transaction id or no current question.
    pub fn begin_answer(
        &mut self,
        option: &InteractionOption,
    ) -> Result<(Ticket, ContinueRequest), ClassifyError> {
        let question_id = self.current_question().map(|question| question.id.clone());
        let (Some(txid), Some(question_id)) = (self.transaction_id.clone(), question_id) else {
            warn!(state = self.state.name(), "answer submitted without an active question");
            self.in_flight = None;
            self.state = SessionState::Errored(ClassifyError::InvalidLocalState);
            return Err(ClassifyError::InvalidLocalState);
        };

        let request = ContinueRequest {
            state: "continue".into(),
            interactionid: question_id.clone(),
            txid,
            values: vec![AnswerValue::from(option)],
            proddesc: self.product_description.clone(),
            profile: self.profile.clone(),
        };

        self.state = SessionState::Loading;
        self.in_flight = Some(InFlight { epoch: self.epoch, answered_question: Some(question_id) });
        debug!(epoch = self.epoch, question = %request.interactionid, "answer dispatched");

        Ok((Ticket { epoch: self.epoch }, request))
    }

    /// Folds the outcome of the request behind `ticket` into the state.
    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<ClassifyResponse, ApiError>,
    ) -> Applied {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.epoch == ticket.epoch => in_flight,
            other => {
                self.in_flight = other;
                info!(
                    ticket_epoch = ticket.epoch,
                    current_epoch = self.epoch,
                    "discarding response for superseded request"
                );
                return Applied::Stale;
            }
        };

        let next = match result {
            Err(err) => Err(ClassifyError::from(err)),
            Ok(response) => match in_flight.answered_question {
                None => self.after_start(response),
                Some(answered) => after_continue(&answered, response),
            },
        };

        self.state = match next {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "classification turn failed");
                SessionState::Errored(err)
            }
        };
        debug!(state = self.state.name(), "classification transition");
        Applied::Transitioned
    }

    /// Drops everything and returns to `Idle`.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.transaction_id = None;
        self.product_description.clear();
        self.state = SessionState::Idle;
        self.in_flight = None;
        debug!(epoch = self.epoch, "classification reset");
    }

    /// Starts classifying `description` and waits for the first turn.
    pub async fn start(&mut self, api: &dyn ClassifierApi, description: &str) -> &SessionState {
        let (ticket, request) = self.begin_start(description);
        let result = api.start(&request).await;
        self.apply(ticket, result);
        &self.state
    }

    /// Answers the current question with `option` and waits for the next turn.
    pub async fn submit_answer(
        &mut self,
        api: &dyn ClassifierApi,
        option: &InteractionOption,
    ) -> &SessionState {
        if let Ok((ticket, request)) = self.begin_answer(option) {
            let result = api.resume(&request).await;
            self.apply(ticket, result);
        }
        &self.state
    }

    fn after_start(&mut self, response: ClassifyResponse) -> Result<SessionState, ClassifyError> {
        self.transaction_id = response.tx_id.clone();

        if let Some(hs_code) = response.resolved_code().map(str::to_string) {
            return Ok(SessionState::Complete {
                hs_code,
                potential_headings: response.potential_headings,
                known: Vec::new(),
            });
        }
        match response.current_item_interaction {
            Some(question) => {
                Ok(SessionState::Questioning { question, known: response.known_interactions })
            }
            None => Err(ClassifyError::UnexpectedResponse),
        }
    }
}

/// Decides the state after a continue response.
///
/// A response may carry a next question and headings at once, so the order
/// of the checks is significant.
fn after_continue(
    answered: &str,
    mut response: ClassifyResponse,
) -> Result<SessionState, ClassifyError> {
    let repeated =
        response.current_item_interaction.as_ref().is_some_and(|question| question.id == answered);

    if !repeated {
        if let Some(question) = response.current_item_interaction.take() {
            return Ok(SessionState::Questioning { question, known: response.known_interactions });
        }
    }

    if let Some(hs_code) = response.resolved_code().map(str::to_string) {
        return Ok(SessionState::Complete {
            hs_code,
            potential_headings: response.potential_headings,
            known: response.known_interactions,
        });
    }

    if repeated {
        if response.potential_headings.is_empty() {
            return Err(ClassifyError::ProtocolStall);
        }
        info!(question = answered, "vendor repeated the question; resolving from headings");
    } else if response.potential_headings.is_empty() {
        return Err(ClassifyError::UnexpectedResponse);
    }

    let hs_code = select_heading(&response.potential_headings)
        .map(|heading| heading.code.clone())
        .ok_or(ClassifyError::UnexpectedResponse)?;
    Ok(SessionState::Complete {
        hs_code,
        potential_headings: response.potential_headings,
        known: response.known_interactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, name: &str) -> InteractionOption {
        InteractionOption { id: id.into(), name: name.into() }
    }

    fn question(id: &str) -> Interaction {
        Interaction {
            id: id.into(),
            name: format!("question {id}"),
            question_text: None,
            options: vec![option("o1", "Portable"), option("o2", "Desktop")],
            answered_values: vec![],
        }
    }

    fn heading(code: &str) -> PotentialHeading {
        PotentialHeading { code: code.into(), description: format!("heading {code}") }
    }

    fn questioning_session() -> ClassificationSession {
        let mut session = ClassificationSession::default();
        let (ticket, _) = session.begin_start("laptop computer");
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                tx_id: Some("tx-1".into()),
                current_item_interaction: Some(question("q1")),
                ..Default::default()
            }),
        );
        session
    }

    #[test]
    fn start_with_code_completes_without_characteristics() {
        let mut session = ClassificationSession::default();
        let (ticket, request) = session.begin_start("coffee");
        assert_eq!(request.proddesc, "coffee");
        assert_eq!(session.state(), &SessionState::Loading);

        session.apply(
            ticket,
            Ok(ClassifyResponse {
                tx_id: Some("tx-1".into()),
                hs_code: Some("0901.21".into()),
                known_interactions: vec![question("ignored")],
                ..Default::default()
            }),
        );

        assert_eq!(session.hs_code(), Some("0901.21"));
        assert!(session.known_characteristics().is_empty());
    }

    #[test]
    fn start_with_question_enters_questioning() {
        let session = questioning_session();
        assert_eq!(session.current_question().unwrap().id, "q1");
        assert_eq!(session.transaction_id(), Some("tx-1"));
    }

    #[test]
    fn start_with_neither_code_nor_question_errors() {
        let mut session = ClassificationSession::default();
        let (ticket, _) = session.begin_start("widget");
        session.apply(ticket, Ok(ClassifyResponse::default()));
        assert_eq!(session.state(), &SessionState::Errored(ClassifyError::UnexpectedResponse));
    }

    #[test]
    fn transport_failure_errors_instead_of_loading() {
        let mut session = ClassificationSession::default();
        let (ticket, _) = session.begin_start("widget");
        session.apply(ticket, Err(ApiError::Status { status: 500, message: "boom".into() }));
        assert!(matches!(session.state(), SessionState::Errored(ClassifyError::NetworkFailure(_))));
    }

    #[test]
    fn answer_builds_single_value_payload() {
        let mut session = questioning_session();
        let (_, request) = session.begin_answer(&option("o1", "Portable")).unwrap();
        assert_eq!(request.interactionid, "q1");
        assert_eq!(request.txid, "tx-1");
        assert_eq!(request.proddesc, "laptop computer");
        assert_eq!(
            request.values,
            vec![AnswerValue { first: "o1".into(), second: "Portable".into() }]
        );
    }

    #[test]
    fn new_question_wins_over_code_and_headings() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o1", "Portable")).unwrap();
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                hs_code: Some("8471.30".into()),
                current_item_interaction: Some(question("q2")),
                known_interactions: vec![question("q1")],
                potential_headings: vec![heading("8471.30")],
                ..Default::default()
            }),
        );
        assert_eq!(session.current_question().unwrap().id, "q2");
        assert_eq!(session.known_characteristics().len(), 1);
    }

    #[test]
    fn code_completes_continue_with_known_interactions() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o1", "Portable")).unwrap();
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                hs_code: Some("8471.30".into()),
                known_interactions: vec![question("q1")],
                ..Default::default()
            }),
        );
        assert_eq!(session.hs_code(), Some("8471.30"));
        assert_eq!(session.known_characteristics().len(), 1);
    }

    #[test]
    fn repeated_question_with_headings_resolves() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o1", "Portable")).unwrap();
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                current_item_interaction: Some(question("q1")),
                potential_headings: vec![heading("1234.56x"), heading("1234.57")],
                ..Default::default()
            }),
        );
        assert_eq!(session.hs_code(), Some("1234.57"));
    }

    #[test]
    fn repeated_question_with_code_completes_with_code() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o1", "Portable")).unwrap();
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                hs_code: Some("8471.30".into()),
                current_item_interaction: Some(question("q1")),
                potential_headings: vec![heading("9999.99")],
                ..Default::default()
            }),
        );
        assert_eq!(session.hs_code(), Some("8471.30"));
        if let SessionState::Complete { potential_headings, .. } = session.state() {
            assert_eq!(potential_headings[0].code, "9999.99");
        }
    }

    #[test]
    fn repeated_question_without_headings_stalls() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o1", "Portable")).unwrap();
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                current_item_interaction: Some(question("q1")),
                ..Default::default()
            }),
        );
        assert_eq!(session.state(), &SessionState::Errored(ClassifyError::ProtocolStall));
    }

    #[test]
    fn headings_only_response_resolves_first_of_wildcards() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o2", "Desktop")).unwrap();
        session.apply(
            ticket,
            Ok(ClassifyResponse {
                potential_headings: vec![heading("1234.56x"), heading("1234.57x")],
                ..Default::default()
            }),
        );
        assert_eq!(session.hs_code(), Some("1234.56x"));
        if let SessionState::Complete { potential_headings, .. } = session.state() {
            assert_eq!(potential_headings.len(), 2);
        }
    }

    #[test]
    fn empty_continue_response_errors() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o2", "Desktop")).unwrap();
        session.apply(ticket, Ok(ClassifyResponse::default()));
        assert_eq!(session.state(), &SessionState::Errored(ClassifyError::UnexpectedResponse));
    }

    #[test]
    fn answer_without_question_is_invalid_local_state() {
        let mut session = ClassificationSession::default();
        let err = session.begin_answer(&option("o1", "Portable")).unwrap_err();
        assert_eq!(err, ClassifyError::InvalidLocalState);
        assert_eq!(
            session.state().error_message().as_deref(),
            Some("Invalid state for submitting answer")
        );
    }

    #[test]
    fn answer_while_loading_is_rejected() {
        let mut session = questioning_session();
        let _in_flight = session.begin_answer(&option("o1", "Portable")).unwrap();
        assert!(session.begin_answer(&option("o2", "Desktop")).is_err());
    }

    #[test]
    fn response_after_reset_is_discarded() {
        let mut session = questioning_session();
        let (ticket, _) = session.begin_answer(&option("o1", "Portable")).unwrap();
        session.reset();

        let applied = session.apply(
            ticket,
            Ok(ClassifyResponse { hs_code: Some("8471.30".into()), ..Default::default() }),
        );

        assert_eq!(applied, Applied::Stale);
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.transaction_id().is_none());
    }

    #[test]
    fn superseded_start_is_discarded() {
        let mut session = ClassificationSession::default();
        let (first, _) = session.begin_start("coffee");
        let (second, _) = session.begin_start("tea");

        let stale = session.apply(
            first,
            Ok(ClassifyResponse { hs_code: Some("0901.21".into()), ..Default::default() }),
        );
        assert_eq!(stale, Applied::Stale);
        assert_eq!(session.state(), &SessionState::Loading);

        session.apply(
            second,
            Ok(ClassifyResponse { hs_code: Some("0902.10".into()), ..Default::default() }),
        );
        assert_eq!(session.hs_code(), Some("0902.10"));
        assert_eq!(session.product_description(), "tea");
    }

    #[test]
    fn errored_session_recovers_with_fresh_start() {
        let mut session = ClassificationSession::default();
        let _ = session.begin_answer(&option("o1", "Portable"));
        assert!(matches!(session.state(), SessionState::Errored(_)));

        let (ticket, _) = session.begin_start("coffee");
        session.apply(
            ticket,
            Ok(ClassifyResponse { hs_code: Some("0901.21".into()), ..Default::default() }),
        );
        assert_eq!(session.hs_code(), Some("0901.21"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = questioning_session();
        session.reset();
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.transaction_id().is_none());
        assert!(session.product_description().is_empty());
        assert!(session.current_question().is_none());
    }
}
