use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use transactional_mailer::{
    domain::communication::{
        OnError, PayloadVariant, TemplateEmail, TransactionalEmailService,
        TransactionalEmailServiceImpl,
    },
    infrastructure::{
        email::mandrill::{MandrillClient, MandrillConfig},
        logging::TracingErrorLog,
        settings::MailchimpSettings,
    },
};

/// Sends one Mandrill template from the command line
#[derive(Debug, Parser)]
pub struct Args {
    /// Recipients as JSON, e.g. `[{"email":"a@example.com"}]`
    #[clap(long)]
    pub to: String,

    /// The sender address
    #[clap(long)]
    pub from: String,

    /// The template name
    #[clap(long)]
    pub template: String,

    /// Template variables as JSON, e.g. `[{"name":"first_name","content":"Jo"}]`
    #[clap(long)]
    pub variables: Option<String>,

    /// The subject line
    #[clap(long)]
    pub subject: Option<String>,

    /// Put variables in `template_content` instead of `global_merge_vars`
    #[clap(long)]
    pub template_content: bool,

    /// Return provider errors instead of logging them
    #[clap(long)]
    pub raise: bool,

    #[clap(flatten)]
    pub mandrill: MandrillConfig,

    #[clap(flatten)]
    pub settings: MailchimpSettings,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let variant = if args.template_content {
        PayloadVariant::TemplateContent
    } else {
        PayloadVariant::MergeVars
    };

    let service = TransactionalEmailServiceImpl::new(
        Arc::new(args.settings),
        Arc::new(MandrillClient::new(args.mandrill)?),
        Arc::new(TracingErrorLog),
    )
    .with_variant(variant);

    let mut email = TemplateEmail::new(args.to, &args.from, &args.template);

    if let Some(variables) = args.variables {
        email = email.with_variables(variables);
    }

    if let Some(subject) = args.subject {
        email = email.with_subject(&subject);
    }

    let response = service
        .send_template(email, OnError::from(args.raise))
        .await?;

    match response {
        Some(response) => println!("{:#}", response),
        None => println!("Email was not sent, see the error log"),
    }

    Ok(())
}
