//! Registration with the host scaffolding pipeline.
//!
//! [`VectorScaffoldPlugin`] hands the host its three integration points:
//!
//! - a [`TypeMappingSource`] for per-column type resolution
//! - [`EnrichingModelFactory`], wrapping the host's model factory so the
//!   catalog enrichment pass runs on every model it builds
//! - [`RewritingCodeGenerator`], wrapping the host's code generator so the
//!   context file is rewritten after emission
//!
//! # Example
//!
//! ```rust,ignore
//! let plugin = VectorScaffoldPlugin::new(ScaffoldConfig::load("scaffold.yaml")?);
//! let factory = plugin.wrap_model_factory(host_factory);
//! let generator = plugin.wrap_code_generator(host_generator);
//!
//! let model = factory.create(&client, &ModelFactoryOptions::default()).await?;
//! let files = generator.generate(&model, &options)?;
//! ```

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{RewriteConfig, ScaffoldConfig};
use crate::core::schema::DatabaseModel;
use crate::core::traits::{
    CatalogClient, CodeGenerator, GenerationOptions, ModelFactory, ModelFactoryOptions,
    ScaffoldedModel, TypeMappingSource,
};
use crate::enrich::CatalogEnricher;
use crate::error::Result;
use crate::rewrite::SourceRewriter;
use crate::typemap::VectorTypeMappingSource;

/// Entry point the host registers.
#[derive(Debug, Clone, Default)]
pub struct VectorScaffoldPlugin {
    config: ScaffoldConfig,
    type_mapping: VectorTypeMappingSource,
}

impl VectorScaffoldPlugin {
    pub fn new(config: ScaffoldConfig) -> Self {
        Self {
            config,
            type_mapping: VectorTypeMappingSource::new(),
        }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// The type mapping slot.
    pub fn type_mapping_source(&self) -> &dyn TypeMappingSource {
        &self.type_mapping
    }

    /// Wrap the host's model factory with catalog enrichment.
    pub fn wrap_model_factory<F>(&self, inner: F) -> EnrichingModelFactory<F> {
        EnrichingModelFactory {
            inner,
            enricher: CatalogEnricher::new(&self.config.enrichment),
        }
    }

    /// Wrap the host's code generator with context rewriting.
    pub fn wrap_code_generator<G>(&self, inner: G) -> RewritingCodeGenerator<G> {
        RewritingCodeGenerator {
            inner,
            rewrite: self.config.rewrite.clone(),
            type_mapping: self.type_mapping,
        }
    }
}

/// Model factory decorator that enriches every model the host builds.
#[derive(Debug)]
pub struct EnrichingModelFactory<F> {
    inner: F,
    enricher: CatalogEnricher,
}

impl<F> EnrichingModelFactory<F> {
    pub fn into_inner(self) -> F {
        self.inner
    }
}

#[async_trait]
impl<C, F> ModelFactory<C> for EnrichingModelFactory<F>
where
    C: CatalogClient + ?Sized,
    F: ModelFactory<C>,
{
    async fn create(&self, connection: &C, options: &ModelFactoryOptions) -> Result<DatabaseModel> {
        let mut model = self.inner.create(connection, options).await?;
        debug!("Host built model with {} tables", model.tables.len());
        let summary = self.enricher.enrich(&mut model, connection).await?;
        debug!("Enrichment summary: {:?}", summary);
        Ok(model)
    }
}

/// Code generator decorator that rewrites the generated context file.
#[derive(Debug)]
pub struct RewritingCodeGenerator<G> {
    inner: G,
    rewrite: RewriteConfig,
    type_mapping: VectorTypeMappingSource,
}

impl<G> RewritingCodeGenerator<G> {
    pub fn into_inner(self) -> G {
        self.inner
    }

    /// Whether the model has vector types, by annotation or by scanning
    /// columns for models that were not enriched.
    fn has_vector_types(&self, model: &DatabaseModel) -> bool {
        model.has_vector_types()
            || model.columns().any(|(_, column)| {
                column
                    .effective_store_type()
                    .and_then(|st| self.type_mapping.find_mapping(st))
                    .is_some()
            })
    }
}

impl<G: CodeGenerator> CodeGenerator for RewritingCodeGenerator<G> {
    fn generate(
        &self,
        model: &DatabaseModel,
        options: &GenerationOptions,
    ) -> Result<ScaffoldedModel> {
        let mut scaffolded = self.inner.generate(model, options)?;

        let has_vector_types = self.has_vector_types(model);
        let mut rewriter = SourceRewriter::new(&self.rewrite);
        if let Some(conn) = &options.connection_string {
            rewriter = rewriter.with_connection_string(conn.as_str());
        }

        let context = &mut scaffolded.context_file;
        context.code = rewriter.rewrite(&context.code, has_vector_types);
        if has_vector_types {
            info!("Enabled pgvector in {}", context.path.display());
        }
        Ok(scaffolded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::core::schema::{DatabaseColumn, DatabaseTable};
    use crate::core::traits::GeneratedFile;
    use crate::error::ScaffoldError;

    struct EchoGenerator;

    impl CodeGenerator for EchoGenerator {
        fn generate(
            &self,
            _model: &DatabaseModel,
            options: &GenerationOptions,
        ) -> Result<ScaffoldedModel> {
            let conn = options.connection_string.clone().unwrap_or_default();
            Ok(ScaffoldedModel {
                context_file: GeneratedFile {
                    path: PathBuf::from(format!("{}.cs", options.context_name)),
                    code: format!("optionsBuilder.UseNpgsql(\"{}\");", conn),
                },
                entity_files: Vec::new(),
            })
        }
    }

    struct FailingGenerator;

    impl CodeGenerator for FailingGenerator {
        fn generate(&self, _: &DatabaseModel, _: &GenerationOptions) -> Result<ScaffoldedModel> {
            Err(ScaffoldError::Generation("template missing".into()))
        }
    }

    fn options() -> GenerationOptions {
        GenerationOptions {
            context_name: "ShopContext".to_string(),
            connection_string: Some("Host=db".to_string()),
        }
    }

    #[test]
    fn test_unannotated_model_is_scanned() {
        let plugin = VectorScaffoldPlugin::default();
        let generator = plugin.wrap_code_generator(EchoGenerator);
        let model = DatabaseModel::new(vec![DatabaseTable::new("public", "items")
            .with_column(DatabaseColumn::new("embedding", Some("vector(3)")))]);

        let out = generator.generate(&model, &options()).unwrap();
        assert_eq!(
            out.context_file.code,
            "optionsBuilder.UseNpgsql(\"Name=ConnectionStrings:DefaultConnection\", o => o.UseVector());"
        );
    }

    #[test]
    fn test_plain_model_is_untouched() {
        let plugin = VectorScaffoldPlugin::default();
        let generator = plugin.wrap_code_generator(EchoGenerator);
        let model = DatabaseModel::new(vec![DatabaseTable::new("public", "items")
            .with_column(DatabaseColumn::new("id", Some("integer")))]);

        let out = generator.generate(&model, &options()).unwrap();
        assert_eq!(out.context_file.code, "optionsBuilder.UseNpgsql(\"Host=db\");");
    }

    #[test]
    fn test_generator_errors_propagate() {
        let generator = VectorScaffoldPlugin::default().wrap_code_generator(FailingGenerator);
        let err = generator
            .generate(&DatabaseModel::default(), &options())
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::Generation(_)));
    }

    #[test]
    fn test_type_mapping_slot() {
        let plugin = VectorScaffoldPlugin::default();
        let source = plugin.type_mapping_source();
        assert!(source.find_mapping("sparsevec(100)").is_some());
        assert!(source.find_mapping("bytea").is_none());
    }
}
