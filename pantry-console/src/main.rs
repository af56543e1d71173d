//! Pantry Console - line-oriented back office for the storefront catalog
//!
//! Restores a persisted session (or prompts for a login), then serves a
//! small command loop over the product catalog. All state handling lives in
//! `pantry-client`; this binary only renders and collects input.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use pantry_client::{
    CatalogCache, ClientConfig, CredentialCell, FileSessionStore, HttpGateway,
    MutationCoordinator, NotificationSink, SessionController, UpsertMode, logger,
};
use shared::models::{IMAGE_SLOT_COUNT, Product, ProductDraft, coerce_price};

/// Prints notifications straight to the terminal.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn success(&self, title: &str) {
        println!("[ok] {title}");
    }

    fn error(&self, title: &str, detail: &str) {
        eprintln!("[error] {title}: {detail}");
    }

    fn confirm(&self, title: &str) -> bool {
        println!("[info] {title}");
        true
    }
}

fn data_dir() -> PathBuf {
    std::env::var("PANTRY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".pantry"))
}

/// Read one trimmed line after a prompt. `None` means the input ended.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt showing the current value; an empty answer keeps it.
fn prompt_with_default(label: &str, current: &str) -> io::Result<Option<String>> {
    let shown = if current.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{current}]")
    };
    match prompt(&shown)? {
        None => Ok(None),
        Some(answer) if answer.is_empty() => Ok(Some(current.to_string())),
        Some(answer) => Ok(Some(answer)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger("warn", false)?;

    let config = ClientConfig::from_env();
    let credential = CredentialCell::new();
    let gateway = Arc::new(HttpGateway::new(&config, credential.clone())?);
    let store = Arc::new(FileSessionStore::new(&data_dir()));
    let catalog = Arc::new(CatalogCache::new());
    let sink = Arc::new(ConsoleSink);

    let session = SessionController::new(
        gateway.clone(),
        store,
        catalog.clone(),
        sink.clone(),
        credential,
    );
    let coordinator = MutationCoordinator::new(gateway, catalog.clone(), sink);

    println!("pantry console ({})", config.base_url);
    if !session.restore_session().await && !login_loop(&session).await? {
        return Ok(());
    }

    command_loop(&session, &coordinator, &catalog).await
}

/// Prompt for credentials until a login succeeds. Returns false on EOF.
async fn login_loop(session: &SessionController) -> Result<bool> {
    loop {
        let Some(username) = prompt("Email")? else {
            return Ok(false);
        };
        if username.is_empty() {
            continue;
        }
        let Some(password) = prompt("Password")? else {
            return Ok(false);
        };
        if session.login(&username, &password).await.is_ok() {
            return Ok(true);
        }
        // The sink already reported the failure; ask again.
    }
}

async fn command_loop(
    session: &SessionController,
    coordinator: &MutationCoordinator,
    catalog: &CatalogCache,
) -> Result<()> {
    print_help();
    loop {
        let Some(line) = prompt("pantry")? else {
            return Ok(());
        };
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("list"), _) => print_catalog(catalog),
            (Some("add"), _) => {
                let Some(draft) = read_draft(None)? else {
                    continue;
                };
                if let Err(e) = coordinator.submit_upsert(UpsertMode::Create, &draft).await {
                    tracing::debug!(error = %e, "create failed");
                }
            }
            (Some("edit"), Some(id)) => match catalog.find(id) {
                Some(product) => {
                    let Some(draft) = read_draft(Some(&product))? else {
                        continue;
                    };
                    if let Err(e) = coordinator.submit_upsert(UpsertMode::Edit, &draft).await {
                        tracing::debug!(error = %e, "edit failed");
                    }
                }
                None => println!("no product with id {id}"),
            },
            (Some("del"), Some(id)) => match catalog.find(id) {
                Some(product) => delete_flow(coordinator, product).await?,
                None => println!("no product with id {id}"),
            },
            (Some("check"), _) => {
                let _ = session.check_session_interactive().await;
            }
            (Some("reload"), _) => {
                if coordinator.refresh_catalog().await.is_ok() {
                    print_catalog(catalog);
                }
            }
            (Some("logout"), _) => {
                session.logout();
                if !login_loop(session).await? {
                    return Ok(());
                }
            }
            (Some("quit"), _) | (Some("exit"), _) => return Ok(()),
            (Some(_), _) => print_help(),
            (None, _) => {}
        }
    }
}

/// Stage the deletion, ask for confirmation, then commit or cancel.
async fn delete_flow(coordinator: &MutationCoordinator, product: Product) -> Result<()> {
    coordinator.request_deletion(product.clone());
    let answer = prompt(&format!("Delete \"{}\"? [y/N]", product.title))?;
    match answer {
        Some(answer) if answer.eq_ignore_ascii_case("y") => {
            if let Err(e) = coordinator.confirm_deletion().await {
                tracing::debug!(error = %e, "delete failed");
            }
        }
        _ => coordinator.cancel_deletion(),
    }
    Ok(())
}

/// Walk the product form. `base` pre-fills an edit; an empty answer keeps
/// the shown value, "-" clears an image slot. Returns None if input ends
/// mid-form.
fn read_draft(base: Option<&Product>) -> io::Result<Option<ProductDraft>> {
    let mut draft = base.map(ProductDraft::from_product).unwrap_or_default();

    let Some(title) = prompt_with_default("Title", &draft.title)? else {
        return Ok(None);
    };
    draft.title = title;

    let Some(category) = prompt_with_default("Category", &draft.category)? else {
        return Ok(None);
    };
    draft.category = category;

    let Some(unit) = prompt_with_default("Unit", &draft.unit)? else {
        return Ok(None);
    };
    draft.unit = unit;

    let Some(origin) = prompt_with_default("Original price", &draft.origin_price.to_string())?
    else {
        return Ok(None);
    };
    draft.origin_price = coerce_price(&origin);

    let Some(price) = prompt_with_default("Sale price", &draft.price.to_string())? else {
        return Ok(None);
    };
    draft.price = coerce_price(&price);

    let Some(description) = prompt_with_default("Description", &draft.description)? else {
        return Ok(None);
    };
    draft.description = description;

    let Some(content) = prompt_with_default("Content", &draft.content)? else {
        return Ok(None);
    };
    draft.content = content;

    let Some(image_url) = prompt_with_default("Main image URL", &draft.image_url)? else {
        return Ok(None);
    };
    draft.image_url = image_url;

    for index in 0..IMAGE_SLOT_COUNT {
        let current = draft.images_url.get(index).unwrap_or("").to_string();
        let Some(url) = prompt_with_default(&format!("Image {}", index + 1), &current)? else {
            return Ok(None);
        };
        draft.set_image(index, if url == "-" { String::new() } else { url });
    }

    let Some(enabled) =
        prompt_with_default("Enabled (y/n)", if draft.is_enabled { "y" } else { "n" })?
    else {
        return Ok(None);
    };
    draft.is_enabled = enabled.eq_ignore_ascii_case("y");

    Ok(Some(draft))
}

fn print_catalog(catalog: &CatalogCache) {
    let products = catalog.current();
    if products.is_empty() {
        println!("(no products)");
        return;
    }
    println!(
        "{:<10} {:<24} {:<12} {:>8} {:>8}  enabled",
        "id", "title", "category", "origin", "price"
    );
    for p in products {
        println!(
            "{:<10} {:<24} {:<12} {:>8} {:>8}  {}",
            p.id,
            p.title,
            p.category,
            p.origin_price,
            p.price,
            if p.is_enabled { "yes" } else { "no" }
        );
    }
}

fn print_help() {
    println!("commands:");
    println!("  list            show the catalog");
    println!("  add             create a product");
    println!("  edit <id>       edit a product");
    println!("  del <id>        delete a product (asks first)");
    println!("  check           verify the session is still valid");
    println!("  reload          refetch the catalog");
    println!("  logout          drop the session");
    println!("  quit            leave");
}
