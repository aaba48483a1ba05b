//! Integration tests for [`command_engine::Dispatcher`].
//!
//! Covers: the bot-level gate on a private bot, per-command visibility on a public
//! bot, first-match-wins ordering, alias equivalence, argument extraction, the
//! unknown-command reply, handler error containment, and help through dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use command_engine::{
    handler_fn, register_builtin_help, AuthPolicy, Command, CommandRegistry, Dispatcher,
};
use parking_lot::RwLock;

const MASTER: &str = "master@example.com";
const OTHER: &str = "someone@example.com";

fn engine(bot_is_public: bool) -> (Dispatcher, Arc<RwLock<CommandRegistry>>) {
    let registry = Arc::new(RwLock::new(CommandRegistry::new()));
    let policy = AuthPolicy::new([MASTER.to_string()], bot_is_public);
    register_builtin_help(&registry, &policy).unwrap();
    let dispatcher = Dispatcher::new(Arc::clone(&registry), policy);
    (dispatcher, registry)
}

/// **Test: A master's command is matched and the handler's reply comes back.**
///
/// **Setup:** Private bot with a master-only `puts <string>` command.
/// **Action:** Dispatch "puts hello" from the master.
/// **Expected:** The handler reply, with the command token stripped from the args.
#[tokio::test]
async fn test_master_command_replies() {
    let (dispatcher, registry) = engine(false);
    registry
        .write()
        .register(
            Command::new("puts <string>", "Write something to stdout", r"^puts\s+.+$"),
            handler_fn(|_, args| Some(format!("'{args}' written"))),
        )
        .unwrap();

    let reply = dispatcher.dispatch(MASTER, "puts hello").await;
    assert_eq!(reply, Some("'hello' written".to_string()));
}

/// **Test: A private bot yields no reply at all to a non-master.**
///
/// **Setup:** Private bot with a public `rand` command.
/// **Action:** Dispatch a public command, help, and gibberish from a stranger.
/// **Expected:** No reply to any of them, and the handler never runs.
#[tokio::test]
async fn test_private_bot_ignores_non_master() {
    let (dispatcher, registry) = engine(false);
    let calls = Arc::new(AtomicUsize::new(0));
    let count = calls.clone();
    registry
        .write()
        .register(
            Command::new("rand", "Produce a random number from 0 to 10", r"^rand$").public(),
            handler_fn(move |_, _| {
                count.fetch_add(1, Ordering::SeqCst);
                Some("4".to_string())
            }),
        )
        .unwrap();

    assert_eq!(dispatcher.dispatch(OTHER, "rand").await, None);
    assert_eq!(dispatcher.dispatch(OTHER, "help").await, None);
    assert_eq!(dispatcher.dispatch(OTHER, "no such command").await, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// **Test: An unmatched message gets the guidance reply quoting the trimmed text.**
#[tokio::test]
async fn test_unknown_command_reply() {
    let (dispatcher, _registry) = engine(false);

    let reply = dispatcher.dispatch(MASTER, "  frobnicate the widget  ").await;
    assert_eq!(
        reply,
        Some(
            "I don't understand 'frobnicate the widget' Try saying 'help' to see what commands I understand."
                .to_string()
        )
    );
}

/// **Test: The earliest registered matching spec wins, not the most specific.**
///
/// **Setup:** A broad `deploy <target>` pattern registered before a narrower one that
/// also matches "deploy prod".
/// **Action:** Dispatch "deploy prod".
/// **Expected:** The broad, earlier command answers.
#[tokio::test]
async fn test_first_match_wins_in_registration_order() {
    let (dispatcher, registry) = engine(false);
    {
        let mut registry = registry.write();
        registry
            .register(
                Command::new("deploy <target>", "Deploy a target", r"^deploy\s+.+$"),
                handler_fn(|_, _| Some("broad".to_string())),
            )
            .unwrap();
        registry
            .register(
                Command::new("deploy-prod", "Deploy production", r"^deploy\s+prod$"),
                handler_fn(|_, _| Some("specific".to_string())),
            )
            .unwrap();
    }

    let reply = dispatcher.dispatch(MASTER, "deploy prod").await;
    assert_eq!(reply, Some("broad".to_string()));
}

/// **Test: An alias invokes the same handler with the same argument extraction.**
#[tokio::test]
async fn test_alias_invokes_same_handler_with_same_args() {
    let (dispatcher, registry) = engine(false);
    let calls = Arc::new(AtomicUsize::new(0));
    let count = calls.clone();
    registry
        .write()
        .register(
            Command::new("puts! <string>", "Write without response", r"^puts!\s+.+$")
                .alias("p! <string>", r"^p!\s+.+$"),
            handler_fn(move |_, args| {
                count.fetch_add(1, Ordering::SeqCst);
                Some(args.to_string())
            }),
        )
        .unwrap();

    assert_eq!(
        dispatcher.dispatch(MASTER, "puts! same payload").await,
        Some("same payload".to_string())
    );
    assert_eq!(
        dispatcher.dispatch(MASTER, "p! same payload").await,
        Some("same payload".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// **Test: On a public bot, anyone can reach a public command through either its
/// primary syntax or its alias.**
#[tokio::test]
async fn test_public_command_and_alias_reachable_by_anyone() {
    let (dispatcher, registry) = engine(true);
    let calls = Arc::new(AtomicUsize::new(0));
    let count = calls.clone();
    registry
        .write()
        .register(
            Command::new("rand", "Produce a random number from 0 to 10", r"^rand$")
                .public()
                .alias("r", r"^r$"),
            handler_fn(move |_, _| {
                count.fetch_add(1, Ordering::SeqCst);
                Some("6".to_string())
            }),
        )
        .unwrap();

    assert_eq!(dispatcher.dispatch("anyone@example.com", "rand").await, Some("6".to_string()));
    assert_eq!(dispatcher.dispatch("anyone@example.com", "r").await, Some("6".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// **Test: On a public bot a non-master can invoke public commands; master-only ones
/// fall through to the guidance reply without running.**
#[tokio::test]
async fn test_public_bot_per_command_visibility() {
    let (dispatcher, registry) = engine(true);
    let calls = Arc::new(AtomicUsize::new(0));
    let count = calls.clone();
    {
        let mut registry = registry.write();
        registry
            .register(
                Command::new("rand", "Produce a random number from 0 to 10", r"^rand$").public(),
                handler_fn(|_, _| Some("7".to_string())),
            )
            .unwrap();
        registry
            .register(
                Command::new("puts <string>", "Write something to stdout", r"^puts\s+.+$"),
                handler_fn(move |_, _| {
                    count.fetch_add(1, Ordering::SeqCst);
                    Some("written".to_string())
                }),
            )
            .unwrap();
    }

    assert_eq!(dispatcher.dispatch(OTHER, "rand").await, Some("7".to_string()));

    let reply = dispatcher.dispatch(OTHER, "puts hello").await;
    assert_eq!(
        reply,
        Some(
            "I don't understand 'puts hello' Try saying 'help' to see what commands I understand."
                .to_string()
        )
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(
        dispatcher.dispatch(MASTER, "puts hello").await,
        Some("written".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// **Test: A spec the sender may not invoke is skipped and the scan continues.**
///
/// **Setup:** Public bot; a master-only `status` command registered before a public
/// command whose pattern also matches "status away".
/// **Action:** Dispatch "status away" as a stranger, then as the master.
/// **Expected:** The stranger reaches the later public command; the master hits the
/// earlier spec.
#[tokio::test]
async fn test_skipped_spec_does_not_stop_the_scan() {
    let (dispatcher, registry) = engine(true);
    {
        let mut registry = registry.write();
        registry
            .register(
                Command::new("status <text>", "Set the status message", r"^status\s+.+$"),
                handler_fn(|_, _| Some("status set".to_string())),
            )
            .unwrap();
        registry
            .register(
                Command::new("echo <text>", "Echo the text back", r"^(status|echo)\s+.+$").public(),
                handler_fn(|_, args| Some(args.to_string())),
            )
            .unwrap();
    }

    assert_eq!(dispatcher.dispatch(OTHER, "status away").await, Some("away".to_string()));
    assert_eq!(
        dispatcher.dispatch(MASTER, "status away").await,
        Some("status set".to_string())
    );
}

/// **Test: A handler error is contained; no reply, and dispatch keeps working.**
#[tokio::test]
async fn test_handler_error_means_no_reply() {
    struct FailingHandler;

    #[async_trait::async_trait]
    impl command_engine::CommandHandler for FailingHandler {
        async fn handle(&self, _sender: &str, _args: &str) -> jbot_core::Result<Option<String>> {
            Err(jbot_core::BotError::Handler("backend offline".to_string()))
        }
    }

    let (dispatcher, registry) = engine(false);
    {
        let mut registry = registry.write();
        registry
            .register(
                Command::new("flaky", "Fails on purpose", r"^flaky$"),
                Arc::new(FailingHandler),
            )
            .unwrap();
        registry
            .register(
                Command::new("ping", "Answer with pong", r"^ping$"),
                handler_fn(|_, _| Some("pong".to_string())),
            )
            .unwrap();
    }

    assert_eq!(dispatcher.dispatch(MASTER, "flaky").await, None);
    assert_eq!(dispatcher.dispatch(MASTER, "ping").await, Some("pong".to_string()));
}

/// **Test: Surrounding whitespace is trimmed before matching.**
#[tokio::test]
async fn test_surrounding_whitespace_is_trimmed() {
    let (dispatcher, registry) = engine(false);
    registry
        .write()
        .register(
            Command::new("ping", "Answer with pong", r"^ping$"),
            handler_fn(|_, _| Some("pong".to_string())),
        )
        .unwrap();

    assert_eq!(dispatcher.dispatch(MASTER, "   ping   ").await, Some("pong".to_string()));
}

/// **Test: A bare command passes empty args to its handler.**
#[tokio::test]
async fn test_bare_command_passes_empty_args() {
    let (dispatcher, registry) = engine(false);
    registry
        .write()
        .register(
            Command::new("ping", "Answer with pong", r"^ping$"),
            handler_fn(|_, args| Some(format!("args:[{args}]"))),
        )
        .unwrap();

    assert_eq!(dispatcher.dispatch(MASTER, "ping").await, Some("args:[]".to_string()));
}

/// **Test: Help and its `?` alias flow through ordinary dispatch.**
#[tokio::test]
async fn test_help_and_alias_flow_through_dispatch() {
    let (dispatcher, registry) = engine(false);
    registry
        .write()
        .register(
            Command::new("rand", "Produce a random number from 0 to 10", r"^rand$").public(),
            handler_fn(|_, _| Some("3".to_string())),
        )
        .unwrap();

    let full = dispatcher.dispatch(MASTER, "help").await.unwrap();
    assert!(full.starts_with("I understand the following commands:\n\n"));
    assert!(full.contains("rand\n"));

    let single = dispatcher.dispatch(MASTER, "? rand").await.unwrap();
    assert!(single.contains("rand\n"));
    assert!(single.contains("  Produce a random number from 0 to 10"));
}

/// **Test: Re-registering a name replaces its descriptor, but dispatch still hits the
/// earlier spec because the spec list is append-only and first match wins.**
#[tokio::test]
async fn test_duplicate_name_overwrites_descriptor_but_first_spec_still_wins() {
    let (dispatcher, registry) = engine(false);
    {
        let mut registry = registry.write();
        registry
            .register(
                Command::new("greet", "Greet politely", r"^greet$"),
                handler_fn(|_, _| Some("good day".to_string())),
            )
            .unwrap();
        registry
            .register(
                Command::new("greet", "Greet briefly", r"^greet$"),
                handler_fn(|_, _| Some("hi".to_string())),
            )
            .unwrap();
    }

    {
        let registry = registry.read();
        assert_eq!(registry.lookup("greet").unwrap().description(), "Greet briefly");
    }
    assert_eq!(dispatcher.dispatch(MASTER, "greet").await, Some("good day".to_string()));
}
