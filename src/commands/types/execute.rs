use std::error::Error;
use std::path::PathBuf;

use tracing::debug;

use super::{DEFAULT_METADATA_PATH, TypesCmd};
use crate::commands::Execute;
use crate::config::Config;
use crate::generator::{DEFAULT_TYPES_PATH, GenerateReport, Generator, GeneratorOptions};
use crate::metadata::MetadataDump;
use crate::prompt::{BatchDecisions, DecisionProvider, InteractiveDecisions};

impl TypesCmd {
    fn metadata_path(&self, config: &Config) -> PathBuf {
        self.metadata
            .clone()
            .or_else(|| config.metadata.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_PATH))
    }

    fn output_dir(&self, config: &Config) -> PathBuf {
        let root = self
            .root
            .clone()
            .or_else(|| config.project_root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let types_path = self
            .types_path
            .clone()
            .or_else(|| config.types_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TYPES_PATH));
        root.join(types_path)
    }

    /// Run generation with an explicit decision provider.
    pub fn generate(
        self,
        config: &Config,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<GenerateReport, Box<dyn Error>> {
        let metadata_path = self.metadata_path(config);
        debug!(path = %metadata_path.display(), "loading metadata");

        let mut source = MetadataDump::load(&metadata_path)?;
        if let Some(namespaces) = &config.entity_namespaces {
            source = source.with_namespaces(namespaces.clone());
        }

        let options = GeneratorOptions {
            output_dir: self.output_dir(config),
            skip_unsupported: self.skip_unsupported,
        };

        let report = Generator::new(&source, decisions, options).run()?;
        Ok(report)
    }
}

impl Execute for TypesCmd {
    type Output = GenerateReport;

    fn execute(self, config: &Config) -> Result<Self::Output, Box<dyn Error>> {
        if self.no_interaction {
            self.generate(config, &mut BatchDecisions)
        } else {
            self.generate(config, &mut InteractiveDecisions::stdio())
        }
    }
}
