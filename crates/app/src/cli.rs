//! Command line argument definitions and parsing using Clap

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "tplkit")]
#[command(about = "Render parameterized command snippets from YAML templates")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Path to the main config file")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'v',
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbosity: u8,

    #[arg(long, help = "Print a starter config and exit")]
    pub generate_config: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a snippet into a command
    Render {
        #[arg(help = "Snippet name")]
        name: String,

        #[arg(
            short,
            long = "set",
            value_name = "NAME=VALUE",
            help = "Value for a variable (repeatable)"
        )]
        set: Vec<String>,

        #[arg(long, help = "Render without validating values")]
        preview: bool,
    },

    /// List snippets
    List {
        #[arg(long, value_delimiter = ',', help = "Only snippets with any of these tags")]
        tags: Vec<String>,

        #[arg(long, conflicts_with = "global", help = "Only directory-local snippets")]
        local: bool,

        #[arg(long, help = "Only global snippets")]
        global: bool,

        #[arg(long, help = "Show commands and tags")]
        verbose: bool,
    },

    /// Search snippets by name, description, command or tag
    Search {
        #[arg(required = true, num_args = 1.., help = "Search text")]
        query: Vec<String>,
    },

    /// Print a snippet definition
    Describe {
        #[arg(help = "Snippet name")]
        name: String,

        #[arg(long, help = "Print as JSON instead of YAML")]
        json: bool,
    },

    /// Show transform templates, variable types or a config summary
    Show {
        #[arg(value_enum, help = "What to show")]
        target: ShowTarget,
    },

    /// Check snippet definitions for mistakes
    Check {
        #[arg(help = "Snippet name (all snippets when omitted)")]
        name: Option<String>,
    },
}

/// Part of the merged configuration printed by `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowTarget {
    /// Shared transform templates
    Transforms,
    /// Variable types
    Types,
    /// Counts, names and settings
    Config,
}

/// Parses `--set` values in `name=value` form. Later values win.
///
/// Only the first `=` separates, so values may contain `=`.
pub fn parse_set_values(values: &[String]) -> Result<HashMap<String, String>> {
    let mut parsed = HashMap::new();

    for entry in values {
        let Some((name, value)) = entry.split_once('=') else {
            bail!("Invalid value format '{entry}'. Expected 'name=value'");
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("Invalid value format '{entry}'. Variable name is empty");
        }
        parsed.insert(name.to_string(), value.to_string());
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_set_values() {
        let values = vec![
            "namespace=kube-system".to_string(),
            "selector=app=web".to_string(),
            "empty=".to_string(),
            "namespace=default".to_string(),
        ];

        let parsed = parse_set_values(&values).unwrap();

        assert_eq!(parsed.get("namespace").map(String::as_str), Some("default"));
        assert_eq!(parsed.get("selector").map(String::as_str), Some("app=web"));
        assert_eq!(parsed.get("empty").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_set_values_invalid() {
        assert!(parse_set_values(&["no_equals".to_string()]).is_err());
        assert!(parse_set_values(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_render_args() {
        let args = Args::try_parse_from([
            "tplkit", "-vv", "render", "get-pods", "--set", "namespace=all", "-s", "watch=1",
            "--preview",
        ])
        .unwrap();

        assert_eq!(args.verbosity, 2);
        match args.command {
            Some(Commands::Render { name, set, preview }) => {
                assert_eq!(name, "get-pods");
                assert_eq!(set, vec!["namespace=all", "watch=1"]);
                assert!(preview);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_list_args() {
        let args = Args::try_parse_from(["tplkit", "list", "--tags", "k8s,docker", "--local"])
            .unwrap();
        match args.command {
            Some(Commands::List {
                tags,
                local,
                global,
                verbose,
            }) => {
                assert_eq!(tags, vec!["k8s", "docker"]);
                assert!(local);
                assert!(!global);
                assert!(!verbose);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Args::try_parse_from(["tplkit", "list", "--local", "--global"]).is_err());
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let args =
            Args::try_parse_from(["tplkit", "check", "--config", "/tmp/c.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.yaml")));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Args::try_parse_from(["tplkit", "search"]).is_err());
        let args = Args::try_parse_from(["tplkit", "search", "get", "pods"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Search { query }) if query.len() == 2));
    }

    #[test]
    fn test_show_targets() {
        for (word, target) in [
            ("transforms", ShowTarget::Transforms),
            ("types", ShowTarget::Types),
            ("config", ShowTarget::Config),
        ] {
            let args = Args::try_parse_from(["tplkit", "show", word]).unwrap();
            assert!(matches!(args.command, Some(Commands::Show { target: t }) if t == target));
        }
        assert!(Args::try_parse_from(["tplkit", "show", "snippets"]).is_err());
        assert!(Args::try_parse_from(["tplkit", "show"]).is_err());
    }

    #[test]
    fn test_describe_args() {
        let args = Args::try_parse_from(["tplkit", "describe", "get-pods", "--json"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Describe { name, json: true }) if name == "get-pods"
        ));
    }

    #[test]
    fn test_generate_config_without_command() {
        let args = Args::try_parse_from(["tplkit", "--generate-config"]).unwrap();
        assert!(args.generate_config);
        assert!(args.command.is_none());
    }
}
