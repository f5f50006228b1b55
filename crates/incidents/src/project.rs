use std::path::PathBuf;
use std::{env, fs};

use crate::config::Config;
use crate::error::{bail, IncidentsError, IncidentsResult};

pub(crate) struct Project {
    /// The root directory of the project.
    root_dir: PathBuf,
}

impl Project {
    pub(crate) const CONFIG: &'static str = "incidents.toml";
    pub(crate) const INDEX: &'static str = "index.json";
    pub(crate) const INCIDENTS_DIR: &'static str = "incidents";

    /// Discovers the root of the project.
    ///
    /// This function fails, if neither the current directory nor any
    /// parent directory contains a project [Config].
    pub(crate) fn discover() -> IncidentsResult<Self> {
        let mut root_dir = env::current_dir()?;

        loop {
            if let Ok(metadata) =
                fs::metadata(root_dir.join(Self::CONFIG))
            {
                if metadata.is_file() {
                    break;
                }
            }

            if !root_dir.pop() {
                bail!("not an incidents project (or any parent directory)");
            }
        }

        Ok(Self { root_dir })
    }

    /// Returns the config associated with the project.
    #[inline]
    pub(crate) fn config(&self) -> IncidentsResult<Config> {
        Config::from_path(self.root_dir.join(Self::CONFIG))
    }

    /// Returns the base directory of the project.
    #[inline]
    pub(crate) fn base_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    /// Returns the output directory configured in `config`.
    #[inline]
    pub(crate) fn output_dir(&self, config: &Config) -> PathBuf {
        self.root_dir.join(&config.output.dir)
    }

    /// Returns the path of the lookup table within the output
    /// directory.
    pub(crate) fn index(&self) -> IncidentsResult<PathBuf> {
        let config = self.config()?;
        let path = self.output_dir(&config).join(Self::INDEX);
        if !path.is_file() {
            return Err(IncidentsError::other(format!(
                "index not found (path = {}), run `incidents build` first",
                path.display()
            )));
        }

        Ok(path)
    }
}
