//! UI-agnostic session state for the strategist widget.
//!
//! The session is a small reducer: the UI feeds it [`Action`]s and gets back
//! the next state plus, at most, one [`Request`] to run. Running the request
//! always ends in an [`Action::Completed`] that is fed back in.

use tracing::debug;

use crate::ai::{ModelGateway, Reply};
use crate::mode::Mode;
use crate::persona::{compose, ComposedPrompt};

/// Identifies one in-flight request and the mode it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub mode: Mode,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub ticket: Ticket,
    pub prompt: ComposedPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectMode(Mode),
    EditInput(String),
    Submit,
    Completed { ticket: Ticket, reply: Reply },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    mode: Mode,
    draft: String,
    response: Option<Reply>,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_ref().map(Reply::text)
    }

    /// Whether the shown response is one of the fallback strings.
    pub fn response_is_fallback(&self) -> bool {
        self.response.as_ref().is_some_and(Reply::is_fallback)
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a `Submit` right now would start a request.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.draft.trim().is_empty()
    }

    pub fn response_label(&self) -> &'static str {
        self.mode.response_label()
    }

    pub fn placeholder(&self) -> &'static str {
        self.mode.placeholder()
    }

    pub fn idle_hint(&self) -> &'static str {
        self.mode.idle_hint()
    }

    /// Apply one action, returning the next state and any request to run.
    pub fn apply(mut self, action: Action) -> (Self, Option<Request>) {
        match action {
            Action::SelectMode(mode) => {
                self.mode = mode;
                self.response = None;
                (self, None)
            }
            Action::EditInput(text) => {
                self.draft = text;
                (self, None)
            }
            Action::Submit => {
                if !self.can_submit() {
                    return (self, None);
                }
                let ticket = Ticket {
                    id: self.next_ticket,
                    mode: self.mode,
                };
                self.next_ticket += 1;
                self.pending = Some(ticket);
                self.response = None;
                let prompt = compose(self.mode, &self.draft);
                debug!(ticket = ticket.id, mode = self.mode.as_str(), "request issued");
                (self, Some(Request { ticket, prompt }))
            }
            Action::Completed { ticket, reply } => {
                if self.pending != Some(ticket) {
                    debug!(ticket = ticket.id, "ignoring completion for unknown ticket");
                    return (self, None);
                }
                self.pending = None;
                if ticket.mode == self.mode {
                    self.response = Some(reply);
                } else {
                    debug!(
                        ticket = ticket.id,
                        issued = ticket.mode.as_str(),
                        current = self.mode.as_str(),
                        "discarding reply issued under another mode"
                    );
                }
                (self, None)
            }
        }
    }

    /// In-place form of [`Session::apply`] for callers that own the session by `&mut`.
    pub fn dispatch(&mut self, action: Action) -> Option<Request> {
        let (next, request) = std::mem::take(self).apply(action);
        *self = next;
        request
    }
}

/// Run a request against a gateway. Always resolves to a completion.
pub async fn run_request<G>(gateway: &G, request: Request) -> Action
where
    G: ModelGateway + ?Sized,
{
    let reply = gateway
        .query(&request.prompt.user_prompt, request.prompt.system_instruction)
        .await;
    Action::Completed {
        ticket: request.ticket,
        reply,
    }
}
