pub mod cli;
pub mod common;
pub mod server;
pub mod timeframe;

use clap::Parser;
use cli::CliArgs;
use common::DumpConfigType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use validator::Validate;

static CONFIG: Lazy<Config> = Lazy::new(Config::new);

pub static APPLICATION_NAME: &str = "media-grabber";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(skip)]
    #[validate(nested)]
    pub run: common::RunConfig,

    /// Path to various programs used by the application at runtime
    #[validate(nested)]
    pub dependency_paths: common::ProgramPathConfig,

    /// Specifying external endpoints that the application will use
    #[validate(nested)]
    pub endpoint: common::EndpointConfig,

    /// Tuning for the extraction strategies
    #[validate(nested)]
    pub extractor: common::ExtractorConfig,

    /// Per-client request throttling
    #[validate(nested)]
    pub rate_limit: common::RateLimitConfig,

    #[validate(nested)]
    pub server: server::ServerConfig,
}
impl Config {
    #[must_use]
    #[inline]
    pub fn global() -> &'static Self {
        &CONFIG
    }

    /// Build a config from already parsed arguments without touching the global instance.
    #[must_use]
    pub fn from_args(args: CliArgs) -> Self {
        Self::default().merge_with_cli(args).resolve_paths()
    }

    pub fn dump_config_if_needed<T>(data: &T, dump_type: &Option<Option<DumpConfigType>>)
    where
        T: Serialize + ?Sized,
    {
        if let Some(dump_type) = dump_type {
            let out = match dump_type {
                None | Some(DumpConfigType::Json) => serde_json::to_string_pretty(data)
                    .expect("Failed to serialize config to JSON"),

                Some(DumpConfigType::Toml) => {
                    toml::to_string_pretty(data).expect("Failed to serialize config to TOML")
                }
            };

            println!("{}", out.trim());
            std::process::exit(0);
        }
    }

    #[inline]
    pub fn validate_config_and_exit<T: Validate>(conf: T) -> T {
        if let Err(e) = conf.validate() {
            eprintln!("Errors validating configuration:");
            print_validation_errors(&e, "  ", 1);
            std::process::exit(1);
        }

        conf
    }

    fn new() -> Self {
        let args = CliArgs::parse();

        Self::from_args(args).validate_self().dump_if_needed()
    }

    fn merge_with_cli(mut self, args: CliArgs) -> Self {
        self.run = args.run;
        self.dependency_paths = args.dependency_path;
        self.endpoint = args.endpoint;
        self.extractor = args.extractor;
        self.rate_limit = args.rate_limit;
        self.server = args.server;

        self
    }

    fn resolve_paths(mut self) -> Self {
        self.dependency_paths = self.dependency_paths.resolve_paths();

        self
    }

    fn dump_if_needed(self) -> Self {
        Self::dump_config_if_needed(&self, &self.run.dump_config);
        self
    }

    #[inline]
    fn validate_self(self) -> Self {
        Self::validate_config_and_exit(self)
    }
}

pub fn print_validation_errors(e: &validator::ValidationErrors, prefix: &str, level: usize) {
    let level = level.max(1);
    for (e_name, e) in e.errors() {
        match e {
            validator::ValidationErrorsKind::Field(e) => {
                let prefix_rep = prefix.repeat(level);
                eprintln!(
                    "{prefix_rep}{e_name}:\n{}",
                    e.iter()
                        .map(|x| format!("{} {:?}", x.code, x.params))
                        .fold(String::new(), |acc, a| format!(
                            "{acc}{prefix_rep}{prefix}- {a}\n"
                        ))
                        .trim_end()
                );
            }

            validator::ValidationErrorsKind::Struct(e) => {
                eprintln!("{}{}:", prefix, e_name);
                print_validation_errors(e, prefix, level + 1);
            }

            validator::ValidationErrorsKind::List(e) => {
                eprintln!("{}{}:", prefix, e_name);
                for e in e.values() {
                    print_validation_errors(e, prefix, level + 1);
                }
            }
        }
    }
}
