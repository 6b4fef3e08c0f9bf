#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Send an email through Gmail from the command line

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use gmail_sender::{
    domain::mail::{BodyFormat, EmailAddress, Mailer, MessageRequest},
    infrastructure::email::smtp::{SMTPConfig, SMTPMailer},
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The recipient's address
    #[clap(long)]
    pub to: String,

    /// The subject line
    #[clap(long)]
    pub subject: String,

    /// The message body
    #[clap(long)]
    pub body: String,

    /// Send the body as HTML
    #[clap(long)]
    pub html: bool,

    /// Carbon-copy recipients
    #[clap(long)]
    pub cc: Vec<String>,

    /// Blind carbon-copy recipients
    #[clap(long)]
    pub bcc: Vec<String>,

    /// Files to attach
    #[clap(long = "attach")]
    pub attachments: Vec<PathBuf>,
}

const MISSING_CREDENTIALS: &str = "Error: Please set GMAIL_SENDER and GMAIL_APP_PASSWORD environment variables.

Example:
  export GMAIL_SENDER='your.email@gmail.com'
  export GMAIL_APP_PASSWORD='your-app-password'";

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if !args.smtp.has_credentials() {
        eprintln!("{MISSING_CREDENTIALS}");

        return Ok(ExitCode::FAILURE);
    }

    let sender = args.smtp.identity()?;

    let request = MessageRequest::new(sender, EmailAddress::new(&args.to)?, args.subject, args.body)
        .with_format(BodyFormat::from_html_flag(args.html))
        .with_cc(EmailAddress::parse_all(&args.cc)?)
        .with_bcc(EmailAddress::parse_all(&args.bcc)?)
        .with_attachments(args.attachments);

    let outcome = SMTPMailer::new(&args.smtp).send_email(request).await;

    for warning in outcome.warnings() {
        eprintln!("Warning: {warning}");
    }

    if outcome.is_success() {
        println!("{}", outcome.status_message());

        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", outcome.status_message());

        Ok(ExitCode::FAILURE)
    }
}
