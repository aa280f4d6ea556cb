//! Command execution

use super::commands::{Cli, Commands, CommonArgs};
use crate::auth::Credentials;
use crate::config::EngineConfig;
use crate::engine::FetchEngine;
use crate::error::{Error, Result};
use crate::pagination::PageShape;
use crate::request::RequestDescriptor;
use crate::types::{Cursor, JsonValue, SubjectId, CURSOR_START};
use std::time::Duration;
use tracing::info;

/// Runs a parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for a parsed CLI
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Lookup {
                url,
                subjects,
                common,
            } => self.run_lookup(url, subjects, common).await,
            Commands::Fetch {
                url,
                subjects,
                records_path,
                cursor_field,
                limit,
                common,
            } => {
                self.run_fetch(url, subjects, records_path, cursor_field, *limit, common)
                    .await
            }
        }
    }

    async fn run_lookup(
        &self,
        template: &str,
        subjects: &[String],
        common: &CommonArgs,
    ) -> Result<()> {
        let engine = build_engine(common)?;
        let subjects = parse_subjects(subjects);
        validate_template(template, &subjects, None)?;

        info!(subjects = subjects.len(), "starting lookup");
        let outcomes = engine
            .execute(&subjects, |subject| {
                descriptor_for(template, subject, None)
                    .expect("template validated before the wave")
            })
            .await;

        let mut output = serde_json::Map::new();
        for (subject, outcome) in outcomes {
            output.insert(subject.to_string(), outcome_json(outcome.into_result()));
        }
        println!("{}", serde_json::to_string_pretty(&JsonValue::Object(output))?);
        Ok(())
    }

    async fn run_fetch(
        &self,
        template: &str,
        subjects: &[String],
        records_path: &str,
        cursor_field: &str,
        limit: Option<usize>,
        common: &CommonArgs,
    ) -> Result<()> {
        let engine = build_engine(common)?;
        let subjects = parse_subjects(subjects);
        validate_template(template, &subjects, Some(CURSOR_START))?;
        let shape = PageShape::new(records_path, cursor_field);

        info!(subjects = subjects.len(), ?limit, "starting paginated fetch");
        let build = |subject: &SubjectId, cursor: Cursor| {
            descriptor_for(template, subject, Some(cursor))
                .expect("template validated before the wave")
        };
        let collected = match limit {
            Some(limit) => engine.collect_up_to(&subjects, shape, build, limit).await,
            None => engine.collect_all(&subjects, shape, build).await,
        };

        let mut output = serde_json::Map::new();
        for (subject, records) in collected {
            output.insert(
                subject.to_string(),
                outcome_json(records.map(JsonValue::Array)),
            );
        }
        println!("{}", serde_json::to_string_pretty(&JsonValue::Object(output))?);
        Ok(())
    }
}

/// Build an engine from the shared flags
fn build_engine(common: &CommonArgs) -> Result<FetchEngine> {
    let mut builder = EngineConfig::builder()
        .concurrency_limit(common.concurrency)
        .timeout(Duration::from_secs(common.timeout));

    if let Some(max) = common.max_retries {
        builder = builder.max_retries(max);
    }
    for header in &common.headers {
        let (name, value) = split_header(header)?;
        builder = builder.header(name, value);
    }
    if let Some(basic) = &common.basic {
        let (username, password) = basic
            .split_once(':')
            .ok_or_else(|| Error::config("--basic expects user:password"))?;
        builder = builder.credentials(&Credentials::basic(username, password));
    }

    Ok(FetchEngine::new(builder.build()))
}

fn parse_subjects(inputs: &[String]) -> Vec<SubjectId> {
    inputs.iter().map(|input| SubjectId::parse(input)).collect()
}

/// Render a URL template for one subject and cursor
fn render_template(template: &str, subject: &SubjectId, cursor: Option<Cursor>) -> String {
    let mut rendered = template.replace("{subject}", &subject.to_string());
    if let Some(cursor) = cursor {
        rendered = rendered.replace("{cursor}", &cursor.to_string());
    }
    rendered
}

fn descriptor_for(
    template: &str,
    subject: &SubjectId,
    cursor: Option<Cursor>,
) -> Result<RequestDescriptor> {
    RequestDescriptor::new(render_template(template, subject, cursor))
}

/// Fail fast on templates that cannot render into valid URLs. Cursor
/// substitution cannot change validity afterwards, so request builders may
/// rely on this.
fn validate_template(
    template: &str,
    subjects: &[SubjectId],
    cursor: Option<Cursor>,
) -> Result<()> {
    if cursor.is_some() && !template.contains("{cursor}") {
        return Err(Error::config("URL template must contain {cursor}"));
    }
    for subject in subjects {
        descriptor_for(template, subject, cursor)?;
    }
    Ok(())
}

/// `Name: value` header flag parsing
fn split_header(input: &str) -> Result<(&str, &str)> {
    let (name, value) = input
        .split_once(':')
        .ok_or_else(|| Error::config(format!("invalid header '{input}', expected Name: value")))?;
    Ok((name.trim(), value.trim()))
}

fn outcome_json(result: std::result::Result<JsonValue, crate::error::TerminalError>) -> JsonValue {
    match result {
        Ok(value) => value,
        Err(err) => serde_json::json!({
            "error": err.to_string(),
            "status": err.status(),
        }),
    }
}
