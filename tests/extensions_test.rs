//! Extension lifecycle integration tests
//! Run with: cargo test --test extensions_test

use std::sync::{Arc, Once};

use glyph_bot::application::services::{Action, LifecycleManager};
use glyph_bot::cogs::{self, CogContext, CogHost};
use glyph_bot::domain::entities::{Message, Reply};
use glyph_bot::domain::traits::ExtensionHost;
use glyph_bot::infrastructure::config::Config;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Full wiring: context -> host -> manager, manager published back.
fn wire() -> (Arc<CogHost>, Arc<LifecycleManager>) {
    ensure_init();

    let ctx = Arc::new(CogContext::new(Config::default()).expect("http client"));
    let host = Arc::new(CogHost::new(ctx.clone()));
    let manager = Arc::new(LifecycleManager::new(
        host.clone(),
        cogs::known_units().clone(),
        cogs::unload_denylist().clone(),
        cogs::root_depth(),
    ));
    ctx.set_manager(manager.clone());
    (host, manager)
}

async fn load_all(manager: &LifecycleManager) {
    let units: Vec<String> = cogs::known_units().iter().cloned().collect();
    let report = manager.apply_batch(Action::Load, &units).await;
    assert!(!report.failed(), "autoload failed: {}", report.message);
}

async fn run_extensions_command(host: &CogHost, args: &[&str]) -> Reply {
    let cog = host
        .cog_for_command("extensions")
        .expect("management cog is loaded");
    let msg = Message::from_command(
        "chat",
        "extensions",
        args.iter().map(|s| s.to_string()).collect(),
    );
    cog.handle(&msg).await.expect("command handled")
}

#[tokio::test]
async fn autoload_brings_up_every_known_extension() {
    let (host, manager) = wire();
    load_all(&manager).await;
    assert_eq!(host.loaded().len(), cogs::known_units().len());
}

#[tokio::test]
async fn wildcard_unload_spares_the_management_cog() {
    let (host, manager) = wire();
    load_all(&manager).await;

    let reply = run_extensions_command(&host, &["unload", "**"]).await;
    let Reply::Embed(embed) = reply else {
        panic!("expected an embed");
    };
    assert!(!embed.to_text().contains("Failures"));

    // Only the denylisted management cog survives.
    assert_eq!(host.loaded(), [cogs::MANAGER_UNIT.to_string()].into());
    assert!(host.cog_for_command("extensions").is_some());
    assert!(host.cog_for_command("ping").is_none());
}

#[tokio::test]
async fn explicit_denylisted_unload_blocks_the_whole_batch() {
    let (host, manager) = wire();
    load_all(&manager).await;

    let reply = run_extensions_command(&host, &["unload", "ping", "extensions"]).await;
    let Reply::Embed(embed) = reply else {
        panic!("expected an embed");
    };
    let text = embed.to_text();
    assert!(text.contains("may not be unloaded"));
    assert!(text.contains(cogs::MANAGER_UNIT));

    // Nothing was touched, including the non-denylisted target.
    assert!(host.loaded().contains(cogs::PING_UNIT));
}

#[tokio::test]
async fn reload_of_an_unloaded_extension_loads_it_fresh() {
    let (host, manager) = wire();
    load_all(&manager).await;
    manager.apply_single(Action::Unload, cogs::PING_UNIT).await;
    assert!(!host.loaded().contains(cogs::PING_UNIT));

    let reply = run_extensions_command(&host, &["reload", "ping"]).await;
    let Reply::Embed(embed) = reply else {
        panic!("expected an embed");
    };
    assert!(embed
        .to_text()
        .contains(&format!("Extension successfully loaded: `{}`.", cogs::PING_UNIT)));
    assert!(host.loaded().contains(cogs::PING_UNIT));
}

#[tokio::test]
async fn load_of_a_loaded_extension_reports_already_loaded() {
    let (host, manager) = wire();
    load_all(&manager).await;

    let reply = run_extensions_command(&host, &["load", "ping"]).await;
    let Reply::Embed(embed) = reply else {
        panic!("expected an embed");
    };
    // Non-fatal: rendered as a confirmation, not an error.
    assert!(embed
        .to_text()
        .contains(&format!("Extension `{}` is already loaded.", cogs::PING_UNIT)));
    assert!(embed.to_text().starts_with('\u{2705}'));
}

#[tokio::test]
async fn unknown_extension_name_aborts_before_any_action() {
    let (host, manager) = wire();
    load_all(&manager).await;

    let cog = host.cog_for_command("extensions").unwrap();
    let msg = Message::from_command(
        "chat",
        "extensions",
        vec!["unload".to_string(), "bogus".to_string(), "ping".to_string()],
    );
    assert!(cog.handle(&msg).await.is_err());
    assert!(host.loaded().contains(cogs::PING_UNIT));
}

#[tokio::test]
async fn list_groups_every_extension_by_category() {
    let (host, manager) = wire();
    load_all(&manager).await;
    manager.apply_single(Action::Unload, cogs::NOTO_UNIT).await;

    let reply = run_extensions_command(&host, &["list"]).await;
    let Reply::Embed(embed) = reply else {
        panic!("expected an embed");
    };
    let text = embed.to_text();

    assert!(text.contains(&format!("Extensions ({})", cogs::known_units().len())));
    assert!(text.contains("**Emojis**"));
    assert!(text.contains("**Previewing**"));
    assert!(text.contains("**Utils**"));
    assert!(text.contains("**Uncategorised**"));
    assert!(text.contains("\u{25cf}  twemoji"));
    assert!(text.contains("\u{25cb}  noto"));
}

#[tokio::test]
async fn emoji_cog_answers_through_the_dispatch_path() {
    let (host, manager) = wire();
    load_all(&manager).await;

    let cog = host.cog_for_command("twemoji").expect("twemoji cog is loaded");
    let msg = Message::from_command("chat", "twemoji", vec!["\u{1f40d}".to_string()]);
    let Reply::Embed(embed) = cog.handle(&msg).await.unwrap() else {
        panic!("expected an embed");
    };
    assert_eq!(embed.title.as_deref(), Some("Snake"));
}
