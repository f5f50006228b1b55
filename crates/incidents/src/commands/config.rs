use std::fmt::Display;
use std::str::FromStr;

use clap::Parser;

use crate::config::Runtime;
use crate::prelude::*;

const OPTIONS: [&str; 5] = [
    "runtime.num_jobs",
    "filter.year",
    "output.batch_size",
    "output.publish",
    "sources.join_policy",
];

/// Get and set config options.
#[derive(Debug, Parser)]
pub(crate) struct Config {
    /// Get the value for the given key.
    #[arg(long, conflicts_with_all = ["value", "unset", "set"])]
    get: bool,

    /// Remove the key from the config.
    #[arg(long, conflicts_with_all = ["value", "get", "set"])]
    unset: bool,

    /// Set the value for the given key.
    #[arg(long, requires = "value", conflicts_with_all = ["get", "unset"])]
    set: bool,

    /// The name of the config option.
    name: String,

    /// The (new) value of the config option.
    #[arg(conflicts_with_all = ["get", "unset"])]
    value: Option<String>,
}

#[inline]
fn print_option<T>(key: &str, value: Option<T>)
where
    T: ToString,
{
    println!(
        "{key} = {}",
        match value {
            Some(value) => value.to_string(),
            None => "None".to_string(),
        }
    );
}

fn parse_value<T>(value: &str) -> IncidentsResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse::<T>().map_err(|e| {
        IncidentsError::other(format!("invalid value `{value}`: {e}"))
    })
}

impl Config {
    pub(crate) fn execute(self) -> IncidentsResult<()> {
        let project = Project::discover()?;
        let mut config = project.config()?;

        let name = self.name.as_str();
        if !OPTIONS.contains(&name) {
            bail!("unknown config option `{name}`");
        }

        if let Some(value) = self.value {
            match name {
                "runtime.num_jobs" => {
                    let value = parse_value::<usize>(&value)?;
                    if let Some(ref mut runtime) = config.runtime {
                        runtime.num_jobs = Some(value);
                    } else {
                        config.runtime = Some(Runtime {
                            num_jobs: Some(value),
                        });
                    }
                }
                "filter.year" => {
                    config.filter.year = Some(parse_value(&value)?);
                    config.filter.from = None;
                    config.filter.to = None;
                }
                "output.batch_size" => {
                    let value = parse_value::<usize>(&value)?;
                    if value == 0 {
                        bail!("output.batch_size must be greater than 0");
                    }
                    config.output.batch_size = value;
                }
                "output.publish" => {
                    config.output.publish = parse_value(&value)?;
                }
                "sources.join_policy" => {
                    config.sources.join_policy = parse_value(&value)?;
                }
                _ => unreachable!(),
            }

            config.save()?;
        } else if self.unset {
            match name {
                "runtime.num_jobs" => config.runtime = None,
                "filter.year" => config.filter.year = None,
                "output.batch_size" => {
                    config.output.batch_size =
                        crate::config::Output::default().batch_size
                }
                "output.publish" => {
                    config.output.publish = Default::default()
                }
                "sources.join_policy" => {
                    config.sources.join_policy = Default::default()
                }
                _ => unreachable!(),
            }

            config.save()?;
        } else if self.get || !self.set {
            match name {
                "runtime.num_jobs" => print_option(
                    name,
                    config.runtime.and_then(|rt| rt.num_jobs),
                ),
                "filter.year" => print_option(name, config.filter.year),
                "output.batch_size" => {
                    print_option(name, Some(config.output.batch_size))
                }
                "output.publish" => {
                    print_option(name, Some(config.output.publish))
                }
                "sources.join_policy" => {
                    print_option(name, Some(config.sources.join_policy))
                }
                _ => unreachable!(),
            }
        } else {
            unreachable!()
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use curator::{JoinPolicy, Publish};

    use super::*;

    #[test]
    fn parse_option_values() {
        assert_eq!(parse_value::<usize>("8").unwrap(), 8);
        assert_eq!(parse_value::<Publish>("all").unwrap(), Publish::All);
        assert_eq!(
            parse_value::<JoinPolicy>("collect-all").unwrap(),
            JoinPolicy::CollectAll
        );
        assert!(parse_value::<usize>("eight").is_err());
        assert!(parse_value::<JoinPolicy>("last-match").is_err());
    }
}
