//! Turn-level scenarios driven by a scripted completion client.
//!
//! Each scripted turn needs two responses: the read phase (cut off at
//! `\MESSAGE`) and the reply phase.

use super::repl::{NO_REPLY_FALLBACK, run_repl};
use super::{Agent, Conversation};
use crate::ai::{AiError, Message, MessageRole, MockAiClient};
use crate::config::initialize_notes_dir;
use crate::error::AgentError;
use crate::notes::{NoteRead, NoteStore, PathRule};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

struct TestHarness {
    _dir: TempDir,
    agent: Agent,
    mock: Arc<MockAiClient>,
    conversation: Conversation,
}

impl TestHarness {
    fn new(responses: Vec<Result<String, AiError>>) -> Self {
        Self::with_rule(responses, PathRule::Legacy)
    }

    fn with_rule(responses: Vec<Result<String, AiError>>, rule: PathRule) -> Self {
        let dir = tempfile::Builder::new()
            .prefix("notebot")
            .tempdir()
            .expect("tempdir");
        let notes_dir = dir.path().join("notes");
        initialize_notes_dir(&notes_dir).expect("notes dir");
        let store = NoteStore::new(notes_dir, rule);
        let mock = Arc::new(MockAiClient::new(responses));
        let agent = Agent::new(store, mock.clone());
        TestHarness {
            _dir: dir,
            agent,
            mock,
            conversation: Conversation::new(),
        }
    }

    fn scripted(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    fn note(&self, path: &str) -> NoteRead {
        self.agent.store().read(path)
    }
}

#[tokio::test]
async fn test_first_turn_writes_note_and_replies() {
    let mut h = TestHarness::scripted(&[
        "",
        "\\MESSAGE\nGot it!\n\\WRITE colors\nfavorite: blue",
    ]);

    let reply = h
        .agent
        .run_turn(&mut h.conversation, "My favorite color is blue.")
        .await
        .unwrap();

    assert_eq!(reply.message, "Got it!");
    assert!(reply.notes_read.is_empty());
    assert_eq!(reply.notes_written, vec!["colors"]);
    assert_eq!(h.note("colors"), NoteRead::Content("favorite: blue".to_string()));
}

#[tokio::test]
async fn test_read_phase_is_cut_at_message_and_reply_phase_is_not() {
    let mut h = TestHarness::scripted(&["", "\\MESSAGE\nhi"]);
    h.agent.run_turn(&mut h.conversation, "hello").await.unwrap();

    let requests = h.mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].stop, Some(vec!["\\MESSAGE".to_string()]));
    assert_eq!(requests[1].stop, None);

    // Read phase: system + user
    assert_eq!(requests[0].messages.len(), 2);
    assert_eq!(requests[0].messages[0].role, MessageRole::System);
    assert_eq!(requests[0].messages[1], Message::user("hello"));
    // Reply phase: the (empty) injected context follows the user message
    assert_eq!(requests[1].messages.len(), 3);
    assert_eq!(requests[1].messages[2], Message::assistant(""));
    // Both phases of a turn share one system prompt
    assert_eq!(requests[0].messages[0], requests[1].messages[0]);
}

#[tokio::test]
async fn test_second_turn_injects_note_content() {
    let mut h = TestHarness::scripted(&[
        "",
        "\\MESSAGE\nGot it!\n\\WRITE colors\nfavorite: blue",
        "\\READ colors",
        "\\MESSAGE\nYour favorite color is blue.",
    ]);

    h.agent
        .run_turn(&mut h.conversation, "My favorite color is blue.")
        .await
        .unwrap();
    let reply = h
        .agent
        .run_turn(&mut h.conversation, "What is my favorite color?")
        .await
        .unwrap();

    assert_eq!(reply.message, "Your favorite color is blue.");
    assert_eq!(reply.notes_read, vec!["colors"]);
    assert!(reply.notes_written.is_empty());

    let requests = h.mock.requests();
    assert_eq!(requests.len(), 4);

    // The new note shows up in the second turn's system prompt
    assert!(requests[2].messages[0].content.ends_with("colors\n"));

    // Reply-phase request carries the injected note as the last message
    let injected = requests[3].messages.last().unwrap();
    assert_eq!(injected.role, MessageRole::Assistant);
    assert_eq!(injected.content, "\\READ colors\nfavorite: blue\n");

    // system + (user, context, reply) from turn one + user, context
    assert_eq!(requests[3].messages.len(), 6);
    assert_eq!(h.conversation.len(), 6);
}

#[tokio::test]
async fn test_missing_and_invalid_reads_use_sentinels() {
    let mut h = TestHarness::scripted(&[
        "I should check.\n\\READ nothing/here\n\\READ secrets.txt\n\\READ\n",
        "\\MESSAGE\nNo notes yet.",
    ]);
    h.agent.run_turn(&mut h.conversation, "hi").await.unwrap();

    let requests = h.mock.requests();
    let injected = &requests[1].messages.last().unwrap().content;
    assert_eq!(
        injected,
        "\\READ nothing/here\n<empty>\n\\READ secrets.txt\n<invalid path>\n"
    );
}

#[tokio::test]
async fn test_absolute_paths_never_leave_the_notes_dir() {
    let dir = tempfile::Builder::new().prefix("notebot").tempdir().unwrap();
    let outside = dir.path().join("escaped");
    let reply_phase = format!(
        "\\MESSAGE\nDone.\n\\WRITE {}\nescaped",
        outside.display()
    );
    let mut h = TestHarness::new(vec![
        Ok("\\READ /etc/passwd".to_string()),
        Ok(reply_phase),
    ]);

    let reply = h.agent.run_turn(&mut h.conversation, "hi").await.unwrap();

    assert!(reply.notes_written.is_empty());
    assert!(!outside.exists());
    let requests = h.mock.requests();
    let injected = &requests[1].messages.last().unwrap().content;
    assert_eq!(injected, "\\READ /etc/passwd\n<invalid path>\n");
}

#[tokio::test]
async fn test_multiple_writes_append_in_order() {
    let mut h = TestHarness::scripted(&[
        "",
        "\\MESSAGE\nNoted both.\n\\WRITE people/alice\nlikes tea\n\\WRITE people/alice\nlives in Oslo\n\\WRITE ../escape\nnope",
    ]);
    let reply = h.agent.run_turn(&mut h.conversation, "facts").await.unwrap();

    assert_eq!(reply.notes_written, vec!["people/alice", "people/alice"]);
    assert_eq!(
        h.note("people/alice"),
        NoteRead::Content("likes tea\nlives in Oslo".to_string())
    );
    assert_eq!(h.agent.store().list_notes(), vec!["people/alice"]);
}

#[tokio::test]
async fn test_strict_rule_accepts_dotted_notes() {
    let mut h = TestHarness::with_rule(
        vec![
            Ok(String::new()),
            Ok("\\MESSAGE\nSaved.\n\\WRITE todo.md\n- call mom".to_string()),
        ],
        PathRule::Strict,
    );
    h.agent.run_turn(&mut h.conversation, "remind me").await.unwrap();
    assert_eq!(h.note("todo.md"), NoteRead::Content("- call mom".to_string()));
}

#[tokio::test]
async fn test_reply_without_message_is_recoverable_and_keeps_writes() {
    let mut h = TestHarness::scripted(&["", "\\WRITE colors\nfavorite: blue"]);

    let err = h
        .agent
        .run_turn(&mut h.conversation, "My favorite color is blue.")
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::NoReply));
    assert!(err.is_recoverable());
    assert_eq!(h.note("colors"), NoteRead::Content("favorite: blue".to_string()));
    // The reply still became part of the history
    assert_eq!(h.conversation.len(), 3);
}

#[tokio::test]
async fn test_completion_failure_is_fatal() {
    let mut h = TestHarness::new(vec![Err(AiError::Http {
        status: 500,
        body: "boom".to_string(),
    })]);

    let err = h.agent.run_turn(&mut h.conversation, "hi").await.unwrap_err();
    assert!(matches!(err, AgentError::Ai(AiError::Http { status: 500, .. })));
    assert!(!err.is_recoverable());
    assert_eq!(h.mock.requests().len(), 1);
}

#[tokio::test]
async fn test_repl_prints_replies_until_quit() {
    let h = TestHarness::scripted(&[
        "",
        "\\MESSAGE\nGot it!\n\\WRITE colors\nfavorite: blue",
    ]);
    let mut conversation = Conversation::new();
    let input = Cursor::new("My favorite color is blue.\nquit\nnever sent\n");
    let mut output = Vec::new();

    run_repl(&h.agent, &mut conversation, input, &mut output)
        .await
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(output, "User: Assistant: Got it!\nUser: ");
    assert_eq!(h.mock.requests().len(), 2);
}

#[tokio::test]
async fn test_repl_uses_fallback_and_continues() {
    let h = TestHarness::scripted(&[
        "",
        "I forgot the protocol",
        "",
        "\\MESSAGE\nSorry, here I am.",
    ]);
    let mut conversation = Conversation::new();
    let input = Cursor::new("hello\r\nhello again\n");
    let mut output = Vec::new();

    run_repl(&h.agent, &mut conversation, input, &mut output)
        .await
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(
        output,
        format!(
            "User: Assistant: {}\nUser: Assistant: Sorry, here I am.\nUser: \n",
            NO_REPLY_FALLBACK
        )
    );
    // CRLF is stripped from user input
    assert_eq!(h.mock.requests()[0].messages[1], Message::user("hello"));
}

#[tokio::test]
async fn test_repl_propagates_fatal_errors() {
    let h = TestHarness::new(vec![Err(AiError::MalformedResponse("no choices".to_string()))]);
    let mut conversation = Conversation::new();
    let mut output = Vec::new();

    let result = run_repl(&h.agent, &mut conversation, Cursor::new("hi\n"), &mut output).await;
    assert!(matches!(result, Err(AgentError::Ai(_))));
}
