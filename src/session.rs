use anyhow::Result;
use std::io::Write;

use crate::format::{format_chat, format_email};
use crate::graph::{GraphClient, HttpTransport};

pub const TEST_SUBJECT: &str = "Test Email";
pub const TEST_BODY: &str = "This is a test email sent from graph_mail_client.";

pub fn print_messages<T: HttpTransport, W: Write>(
    graph: &GraphClient<T>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "\nFetching emails from Outlook...\n")?;
    let emails = graph.list_messages()?;
    if emails.is_empty() {
        writeln!(out, "No emails found.")?;
    }
    for email in &emails {
        writeln!(out, "{}\n", format_email(email))?;
    }
    Ok(())
}

pub fn print_chats<T: HttpTransport, W: Write>(
    graph: &GraphClient<T>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "\nFetching chats from Microsoft Teams...\n")?;
    let chats = graph.list_chats()?;
    if chats.is_empty() {
        writeln!(out, "No chats found.")?;
    }
    for chat in &chats {
        writeln!(out, "{}\n", format_chat(chat))?;
    }
    Ok(())
}

/// The no-argument run: list mail, mail the mailbox owner, list chats.
/// Stops at the first step that fails.
pub fn run_default_sequence<T: HttpTransport, W: Write>(
    graph: &GraphClient<T>,
    out: &mut W,
) -> Result<()> {
    print_messages(graph, out)?;

    writeln!(out, "\nSending a test email...\n")?;
    let me = vec![graph.user_email().to_string()];
    graph.send_mail(TEST_SUBJECT, TEST_BODY, &me)?;
    writeln!(out, "Email sent successfully!")?;

    print_chats(graph, out)
}
