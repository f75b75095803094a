//! Command handlers
//!
//! Each handler writes its result to `out` and diagnostics to `err`, and
//! returns the process exit code.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::CommandFactory;
use tplkit_application::{
    CheckSnippets, ListSnippets, ListSnippetsInput, LoadConfig, LoadConfigInput, ProcessSnippet,
    ProcessSnippetInput, ProcessError, SearchSnippets, SnippetEntry,
};
use tplkit_domain::{Config, SnippetSource, Transform, Validation};
use tplkit_infrastructure::{
    LOCAL_SNIPPETS_FILE, TokioFileSystem, YamlConfigRepository, default_config_path, to_yaml,
};

use crate::cli::{Args, Commands, ShowTarget, parse_set_values};

/// Runs the parsed command line.
pub async fn run(args: Args, out: &mut dyn Write, err: &mut dyn Write) -> Result<ExitCode> {
    if args.generate_config {
        return generate_config(out);
    }

    let Some(command) = args.command else {
        Args::command().write_help(&mut &mut *err)?;
        return Ok(ExitCode::FAILURE);
    };

    let path = match args.config {
        Some(path) => path,
        None => default_config_path()
            .ok_or_else(|| anyhow!("cannot locate the home directory, pass --config"))?,
    };
    let config = load_config(path).await?;

    match command {
        Commands::Render { name, set, preview } => render(&config, &name, &set, preview, out, err),
        Commands::List {
            tags,
            local,
            global,
            verbose,
        } => {
            let source = if local {
                Some(SnippetSource::Local)
            } else if global {
                Some(SnippetSource::Global)
            } else {
                None
            };
            list(&config, ListSnippetsInput { tags, source }, verbose, out)
        }
        Commands::Search { query } => search(&config, &query.join(" "), out),
        Commands::Describe { name, json } => describe(&config, &name, json, out),
        Commands::Show { target } => show(&config, target, out),
        Commands::Check { name } => check(&config, name.as_deref(), out),
    }
}

async fn load_config(path: PathBuf) -> Result<Config> {
    let local = std::env::current_dir()
        .context("reading the working directory")?
        .join(LOCAL_SNIPPETS_FILE);
    let repo = YamlConfigRepository::new(TokioFileSystem::new()).with_local_file(local);

    let loaded = LoadConfig::new(repo)
        .execute(LoadConfigInput { path: path.clone() })
        .await
        .with_context(|| format!("loading config from {}", path.display()))?;
    Ok(loaded.config)
}

fn generate_config(out: &mut dyn Write) -> Result<ExitCode> {
    let yaml = to_yaml(&Config::starter())?;
    out.write_all(yaml.as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

/// Renders a snippet and prints the command.
pub fn render(
    config: &Config,
    name: &str,
    set: &[String],
    preview: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<ExitCode> {
    let values = parse_set_values(set)?;
    let output = ProcessSnippet::new(config).execute(ProcessSnippetInput {
        name: name.to_string(),
        values,
        preview,
    })?;

    let result = output.result;
    if !result.is_complete() {
        tracing::warn!(
            snippet = name,
            placeholders = ?result.unbound,
            "command has placeholders without a variable"
        );
    }
    if config.settings.interactive.show_final_command {
        writeln!(err, "Command: {}", result.command)?;
    }
    writeln!(out, "{}", result.command)?;
    Ok(ExitCode::SUCCESS)
}

/// Lists snippets, optionally filtered.
pub fn list(
    config: &Config,
    input: ListSnippetsInput,
    verbose: bool,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let entries = ListSnippets::new(config).execute(&input);
    print_entries(&entries, verbose, out)?;
    Ok(ExitCode::SUCCESS)
}

/// Searches snippets and lists the matches.
pub fn search(config: &Config, query: &str, out: &mut dyn Write) -> Result<ExitCode> {
    let entries = SearchSnippets::new(config).execute(query);
    print_entries(&entries, false, out)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints one snippet definition.
pub fn describe(config: &Config, name: &str, json: bool, out: &mut dyn Write) -> Result<ExitCode> {
    let snippet = config
        .snippet(name)
        .ok_or_else(|| ProcessError::SnippetNotFound(name.to_string()))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, snippet)?;
        writeln!(out)?;
    } else {
        out.write_all(to_yaml(snippet)?.as_bytes())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints transform templates, variable types or a config summary.
pub fn show(config: &Config, target: ShowTarget, out: &mut dyn Write) -> Result<ExitCode> {
    match target {
        ShowTarget::Transforms => show_transforms(config, out)?,
        ShowTarget::Types => show_types(config, out)?,
        ShowTarget::Config => show_config(config, out)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_transforms(config: &Config, out: &mut dyn Write) -> Result<()> {
    if config.transform_templates.is_empty() {
        writeln!(out, "No transform templates defined.")?;
        return Ok(());
    }

    writeln!(out, "Transform Templates:")?;
    for (name, template) in &config.transform_templates {
        writeln!(out)?;
        writeln!(out, "{name}:")?;
        if !template.description.is_empty() {
            writeln!(out, "  Description: {}", template.description)?;
        }
        if let Some(transform) = &template.transform {
            write_transform(transform, "  ", out)?;
        }
    }
    Ok(())
}

fn show_types(config: &Config, out: &mut dyn Write) -> Result<()> {
    if config.variable_types.is_empty() {
        writeln!(out, "No variable types defined.")?;
        return Ok(());
    }

    writeln!(out, "Variable Types:")?;
    for (name, variable_type) in &config.variable_types {
        writeln!(out)?;
        writeln!(out, "{name}:")?;
        if !variable_type.description.is_empty() {
            writeln!(out, "  Description: {}", variable_type.description)?;
        }
        if !variable_type.default_value.is_empty() {
            writeln!(out, "  Default: {}", variable_type.default_value)?;
        }
        if let Some(validation) = &variable_type.validation {
            writeln!(out, "  Validation:")?;
            write_validation(validation, "    ", out)?;
        }
        if let Some(transform) = &variable_type.transform {
            writeln!(out, "  Transform:")?;
            write_transform(transform, "    ", out)?;
        }
    }
    Ok(())
}

/// Snippet names beyond this count are summarized.
const SUMMARY_SNIPPET_LIMIT: usize = 10;

fn show_config(config: &Config, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Configuration Summary:")?;
    writeln!(out)?;
    write_names(
        "Transform Templates",
        config.transform_templates.keys(),
        config.transform_templates.len(),
        out,
    )?;
    write_names(
        "Variable Types",
        config.variable_types.keys(),
        config.variable_types.len(),
        out,
    )?;

    let count = config.snippets.len();
    writeln!(out, "Snippets: {count}")?;
    let shown = if count > SUMMARY_SNIPPET_LIMIT { 5 } else { count };
    for name in config.snippets.keys().take(shown) {
        writeln!(out, "  - {name}")?;
    }
    if shown < count {
        writeln!(out, "  ... and {} more", count - shown)?;
    }
    writeln!(out)?;

    let settings = &config.settings;
    writeln!(out, "Settings:")?;
    if !settings.additional_configs.is_empty() {
        writeln!(
            out,
            "  Additional Configs: {}",
            settings.additional_configs.join(", ")
        )?;
    }
    writeln!(
        out,
        "  Interactive Settings: confirm_before_execute={}, show_final_command={}",
        settings.interactive.confirm_before_execute, settings.interactive.show_final_command
    )?;
    Ok(())
}

fn write_names<'a>(
    label: &str,
    names: impl Iterator<Item = &'a String>,
    count: usize,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "{label}: {count}")?;
    for name in names {
        writeln!(out, "  - {name}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_transform(transform: &Transform, indent: &str, out: &mut dyn Write) -> Result<()> {
    if !transform.empty_value.is_empty() {
        writeln!(out, "{indent}Empty Value: {}", transform.empty_value)?;
    }
    write_block("Value Pattern", &transform.value_pattern, indent, out)?;
    if !transform.true_value.is_empty() {
        writeln!(out, "{indent}True Value: {}", transform.true_value)?;
    }
    if !transform.false_value.is_empty() {
        writeln!(out, "{indent}False Value: {}", transform.false_value)?;
    }
    write_block("Compose", &transform.compose, indent, out)
}

/// Writes a template field, as a `|` block when it spans several lines.
fn write_block(label: &str, text: &str, indent: &str, out: &mut dyn Write) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    if !text.contains('\n') {
        writeln!(out, "{indent}{label}: {text}")?;
        return Ok(());
    }
    writeln!(out, "{indent}{label}: |")?;
    for line in text.lines() {
        writeln!(out, "{indent}  {line}")?;
    }
    Ok(())
}

fn write_validation(validation: &Validation, indent: &str, out: &mut dyn Write) -> Result<()> {
    if !validation.options.is_empty() {
        writeln!(out, "{indent}Allowed values: {}", validation.options.join(", "))?;
    }
    if let Some((min, max)) = validation.bounds() {
        writeln!(out, "{indent}Range: {min} - {max}")?;
    }
    if !validation.pattern.is_empty() {
        writeln!(out, "{indent}Pattern: {}", validation.pattern)?;
    }
    Ok(())
}

/// Checks snippet definitions. Fails when any issue is found.
pub fn check(config: &Config, name: Option<&str>, out: &mut dyn Write) -> Result<ExitCode> {
    let reports = CheckSnippets::new(config).execute(name)?;
    let mut failed = 0usize;

    for report in &reports {
        if report.is_clean() {
            continue;
        }
        failed += 1;
        writeln!(out, "{}:", report.key)?;
        for issue in &report.issues {
            writeln!(out, "  - {issue}")?;
        }
    }

    if failed == 0 {
        writeln!(out, "{} snippet(s) OK", reports.len())?;
        return Ok(ExitCode::SUCCESS);
    }
    writeln!(out, "{failed} of {} snippet(s) have issues", reports.len())?;
    Ok(ExitCode::FAILURE)
}

fn print_entries(entries: &[SnippetEntry<'_>], verbose: bool, out: &mut dyn Write) -> Result<()> {
    if entries.is_empty() {
        writeln!(out, "No snippets found.")?;
        return Ok(());
    }

    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    for entry in entries {
        let snippet = entry.snippet;
        let marker = match snippet.source {
            SnippetSource::Local => " (local)",
            SnippetSource::Global => "",
        };
        let line = format!("{:<width$}  {}{marker}", entry.key, snippet.description);
        writeln!(out, "{}", line.trim_end())?;

        if verbose {
            writeln!(out, "    command: {}", snippet.command)?;
            if !snippet.tags.is_empty() {
                writeln!(out, "    tags: {}", snippet.tags.join(", "))?;
            }
        }
    }
    Ok(())
}
