use std::sync::Mutex;

use async_trait::async_trait;
use resonance_core::{
    run_request, Action, ModelGateway, Mode, Reply, Session, CONNECTION_FALLBACK,
    SYSTEM_INSTRUCTION,
};

/// Gateway that replays a fixed reply and remembers every prompt it saw.
struct ScriptedGateway {
    reply: Reply,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn query(&self, user_prompt: &str, system_instruction: &str) -> Reply {
        self.calls
            .lock()
            .unwrap()
            .push((user_prompt.to_string(), system_instruction.to_string()));
        self.reply.clone()
    }
}

async fn submit_and_resolve(session: &mut Session, gateway: &ScriptedGateway) -> bool {
    match session.dispatch(Action::Submit) {
        Some(request) => {
            assert!(session.is_pending());
            let completion = run_request(gateway, request).await;
            session.dispatch(completion);
            true
        }
        None => false,
    }
}

#[tokio::test]
async fn chat_question_round_trip() {
    let gateway = ScriptedGateway::new(Reply::Answer("Find leverage.".into()));
    let mut session = Session::new(Mode::Chat);
    session.dispatch(Action::EditInput("How do I find my niche?".into()));

    assert!(submit_and_resolve(&mut session, &gateway).await);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    let (prompt, system) = &calls[0];
    assert!(prompt.contains("How do I find my niche?"));
    assert!(prompt.starts_with("[CHAT MODE] User query:"));
    assert_eq!(system, SYSTEM_INSTRUCTION);

    assert!(!session.is_pending());
    assert_eq!(session.response(), Some("Find leverage."));
    assert_eq!(session.draft(), "How do I find my niche?");
}

#[tokio::test]
async fn match_description_round_trip() {
    let report = "Synergy: 82%. You might survive the chaos.";
    let gateway = ScriptedGateway::new(Reply::Answer(report.into()));
    let mut session = Session::default();
    session.dispatch(Action::SelectMode(Mode::Match));
    session.dispatch(Action::EditInput("I am detail-oriented and calm.".into()));

    assert!(submit_and_resolve(&mut session, &gateway).await);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.starts_with("[MATCH MODE] User description:"));
    assert!(calls[0].0.contains("I am detail-oriented and calm."));
    assert!(calls[0].0.contains("Evaluate compatibility as an Integrator"));
    assert_eq!(session.response(), Some(report));
    assert_eq!(session.response_label(), "Compatibility Report");
}

#[tokio::test]
async fn blank_draft_never_reaches_gateway() {
    let gateway = ScriptedGateway::new(Reply::Answer("unused".into()));
    let mut session = Session::default();
    session.dispatch(Action::EditInput("   \n ".into()));

    assert!(!submit_and_resolve(&mut session, &gateway).await);
    assert!(gateway.calls().is_empty());
    assert!(!session.is_pending());
}

#[tokio::test]
async fn failure_keeps_draft_and_unblocks() {
    let gateway = ScriptedGateway::new(Reply::Broken);
    let mut session = Session::default();
    session.dispatch(Action::EditInput("will this work?".into()));

    assert!(submit_and_resolve(&mut session, &gateway).await);
    assert_eq!(session.response(), Some(CONNECTION_FALLBACK));
    assert_eq!(session.draft(), "will this work?");
    assert!(session.can_submit());

    // A retry by the user goes through again
    assert!(submit_and_resolve(&mut session, &gateway).await);
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test]
async fn only_one_request_in_flight() {
    let gateway = ScriptedGateway::new(Reply::Answer("done".into()));
    let mut session = Session::default();
    session.dispatch(Action::EditInput("q".into()));

    let request = session.dispatch(Action::Submit).unwrap();
    assert!(session.dispatch(Action::Submit).is_none());
    assert!(session.dispatch(Action::Submit).is_none());

    let completion = run_request(&gateway, request).await;
    session.dispatch(completion);
    assert_eq!(gateway.calls().len(), 1);
    assert_eq!(session.response(), Some("done"));
}
