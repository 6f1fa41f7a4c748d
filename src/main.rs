mod auth;
mod config;
mod gmail;
mod labels;
mod mailbox;
mod mime;
mod models;
mod query;
mod reply;
mod ticket;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::config::Config;
use crate::gmail::GmailMailbox;
use crate::mailbox::{Mailbox, MailboxError};
use crate::models::TicketSummary;
use crate::query::{TicketQuery, TrashOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let debug_logging = std::env::args().any(|arg| arg == "--debug");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if debug_logging {
            "deskbot=debug"
        } else {
            "deskbot=warn"
        })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();

    // Handle token reset
    if std::env::args().any(|arg| arg == "--reset-token") {
        auth::RingStorage.clear_token().await?;
        println!("Token cleared. Please restart without --reset-token to re-authenticate.");
        return Ok(());
    }

    let hub = auth::build_hub(&config.auth.credentials_path).await?;
    let tickets = TicketQuery::new(
        GmailMailbox::new(hub),
        config.account.sender.clone(),
        config.workflow.in_progress_label.clone(),
    );

    run_menu(&tickets).await
}

async fn run_menu<M: Mailbox>(tickets: &TicketQuery<M>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        println!("----------------------------------");
        println!("           Help-Desk Bot           ");
        println!("----------------------------------");
        println!("1. List unread tickets");
        println!("2. Search tickets");
        println!("3. Read full ticket");
        println!("4. Reply to ticket");
        println!("5. Label ticket IN_PROGRESS");
        println!("6. Trash a ticket");
        println!("0. Exit");
        println!("----------------------------------");

        let Some(choice) = prompt(&mut lines, "Choice: ").await? else {
            break;
        };

        match choice.as_str() {
            "1" => list_unread(tickets).await,
            "2" => {
                let Some(query) = prompt(&mut lines, "Enter search query: ").await? else {
                    break;
                };
                search(tickets, &query).await;
            }
            "3" => {
                let Some(id) = prompt(&mut lines, "Enter message ID to read: ").await? else {
                    break;
                };
                match tickets.read_full(&id).await {
                    Ok(body) => println!("{body}"),
                    Err(e) => report(e),
                }
            }
            "4" => {
                let Some(id) = prompt(&mut lines, "Enter message ID to reply to: ").await? else {
                    break;
                };
                let Some(body) = prompt(&mut lines, "Enter reply text: ").await? else {
                    break;
                };
                match tickets.reply(&id, &body).await {
                    Ok(sent_id) => println!("Reply sent. ID: {sent_id}"),
                    Err(e) => report(e),
                }
            }
            "5" => {
                let Some(id) =
                    prompt(&mut lines, "Enter message ID to label IN_PROGRESS: ").await?
                else {
                    break;
                };
                match tickets.label_in_progress(&id).await {
                    Ok(label_id) => {
                        println!("Label applied (ID: {label_id}) to message {id}.");
                    }
                    Err(e) => report(e),
                }
            }
            "6" => {
                let Some(id) = prompt(&mut lines, "Enter message ID to trash: ").await? else {
                    break;
                };
                let Some(confirmation) = prompt(&mut lines, "Are you sure? (y/n): ").await?
                else {
                    break;
                };
                match tickets.trash(&id, &confirmation).await {
                    Ok(TrashOutcome::Trashed) => println!(
                        "Message (ID: {id}) moved to Trash (30-day retention). This action is reversible."
                    ),
                    Ok(TrashOutcome::Cancelled) => println!("Trash cancelled."),
                    Err(e) => report(e),
                }
            }
            "0" => {
                println!("Exiting program");
                break;
            }
            _ => println!("Invalid input. Please choose 0-6."),
        }
    }

    Ok(())
}

async fn list_unread<M: Mailbox>(tickets: &TicketQuery<M>) {
    match tickets.list_unread().await {
        Ok(summaries) if summaries.is_empty() => println!("No messages found."),
        Ok(summaries) => {
            println!("--- Unread Tickets (latest 10) -----------------------");
            for (i, ticket) in summaries.iter().enumerate() {
                println!(
                    "{}. Subject: {} || From: {} || Message ID: {}",
                    i + 1,
                    ticket.subject,
                    ticket.sender,
                    ticket.id
                );
            }
            println!("------------------------------------------------------");
        }
        Err(e) => report(e),
    }
}

async fn search<M: Mailbox>(tickets: &TicketQuery<M>, query: &str) {
    match tickets.search(query).await {
        Ok(summaries) if summaries.is_empty() => println!("No messages found."),
        Ok(summaries) => {
            println!("--- Custom Query: {query} (latest 20) -----------------------");
            for (i, ticket) in summaries.iter().enumerate() {
                print_with_snippet(i + 1, ticket);
            }
            println!("------------------------------------------------------");
        }
        Err(e) => report(e),
    }
}

fn print_with_snippet(number: usize, ticket: &TicketSummary) {
    println!(
        "{}. Subject: {} || From: {} || Snippet: {} || Message ID: {}",
        number, ticket.subject, ticket.sender, ticket.snippet, ticket.id
    );
}

/// Print a prompt and read one trimmed line. `None` means stdin closed.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    println!("{text}");
    Ok(lines.next_line().await?.map(|s| s.trim().to_string()))
}

/// Present a classified failure and return to the menu. No retry here;
/// the mailbox is the sole source of truth and the user can just re-run.
fn report(err: MailboxError) {
    match err {
        MailboxError::NotFound(_) => println!("No message found."),
        other => println!("Error occurred: {other}"),
    }
}
