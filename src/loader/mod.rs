//! # Handler Loader
//!
//! Resolves a [`SourceDescriptor`] into a [`BoundHandler`].
//!
//! ## Resolution
//!
//! ```text
//! SourceDescriptor::File    -> read module ─┐
//! SourceDescriptor::Archive -> extract zip  │
//!                              read entry   │
//!                              purge scratch┤
//!                                           └-> parse FunctionModule
//!                                               -> find target function
//!                                               -> look up handler class in HandlerRegistry
//!                                               -> run factory (once)
//!                                               -> validate_config
//!                                               -> BoundHandler
//! ```
//!
//! Any failure is a [`LoadError`] and aborts startup.

pub mod archive;
pub mod errors;
pub mod manifest;
pub mod source;

pub use archive::ScratchWorkspace;
pub use errors::{LoadError, LoadResult};
pub use manifest::{FunctionDefinition, FunctionModule};
pub use source::{SourceDescriptor, SourceKind};

use crate::execution::BoundHandler;
use crate::registry::HandlerRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Binds function sources to registered handler classes
#[derive(Debug, Clone)]
pub struct HandlerLoader {
    registry: Arc<HandlerRegistry>,
    scratch_root: Option<PathBuf>,
}

impl HandlerLoader {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            scratch_root: None,
        }
    }

    /// Extract archives under `root` instead of the system temp dir
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Resolve the described source into a bound handler
    pub fn resolve(&self, descriptor: &SourceDescriptor) -> LoadResult<BoundHandler> {
        let result = match descriptor {
            SourceDescriptor::File {
                path,
                function_name,
            } => self.load_from_file(path, function_name),
            SourceDescriptor::Archive {
                path,
                entry_file,
                function_name,
            } => self.load_from_archive(path, entry_file, function_name),
        };

        match &result {
            Ok(bound) => info!(
                source_type = %descriptor.kind(),
                source = %descriptor.path().display(),
                function = %bound.function_name,
                handler_class = %bound.handler_class,
                "✅ Handler loaded"
            ),
            Err(e) => error!(
                source_type = %descriptor.kind(),
                source = %descriptor.path().display(),
                error = %e,
                "❌ Failed to load handler"
            ),
        }

        result
    }

    fn load_from_file(&self, path: &Path, function_name: &str) -> LoadResult<BoundHandler> {
        let origin = path.display().to_string();
        if !path.is_file() {
            return Err(LoadError::source_not_found(origin));
        }

        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(&origin, e))?;
        self.bind(&text, &origin, function_name)
    }

    fn load_from_archive(
        &self,
        archive_path: &Path,
        entry_file: &str,
        function_name: &str,
    ) -> LoadResult<BoundHandler> {
        let archive_display = archive_path.display().to_string();
        if !archive_path.is_file() {
            return Err(LoadError::source_not_found(archive_display));
        }
        archive::validate_entry_name(entry_file)?;

        let workspace = ScratchWorkspace::create(self.scratch_root.as_deref())?;
        let text = Self::read_entry(&workspace, archive_path, entry_file);

        // The workspace goes away here on both paths; a failed purge on the
        // success path is reported but does not fail the load.
        if let Err(e) = workspace.purge() {
            warn!(error = %e, "Scratch workspace was not fully purged");
        }

        let origin = format!("{archive_display}!{entry_file}");
        self.bind(&text?, &origin, function_name)
    }

    fn read_entry(
        workspace: &ScratchWorkspace,
        archive_path: &Path,
        entry_file: &str,
    ) -> LoadResult<String> {
        workspace.extract(archive_path)?;

        let entry_path = workspace.entry_path(entry_file)?;
        if !entry_path.is_file() {
            return Err(LoadError::entry_not_found(
                entry_file,
                archive_path.display().to_string(),
            ));
        }

        std::fs::read_to_string(&entry_path)
            .map_err(|e| LoadError::io(entry_path.display().to_string(), e))
    }

    /// Bind `function_name` from module text to its registered handler class
    fn bind(&self, text: &str, origin: &str, function_name: &str) -> LoadResult<BoundHandler> {
        let module = FunctionModule::parse(text, origin)?;

        let definition = module
            .function(function_name)
            .ok_or_else(|| LoadError::function_not_defined(function_name, origin))?;

        let registered = self.registry.get(&definition.handler_class).ok_or_else(|| {
            LoadError::unknown_handler_class(
                function_name,
                &definition.handler_class,
                &self.registry.classes(),
            )
        })?;

        let handler = registered
            .instantiate(&definition.handler_config)
            .map_err(|e| {
                LoadError::contract_violation(function_name, &definition.handler_class, e)
            })?;

        handler
            .validate_config(&definition.handler_config)
            .map_err(|e| {
                LoadError::contract_violation(function_name, &definition.handler_class, e)
            })?;

        Ok(BoundHandler::new(
            function_name,
            definition.handler_class.clone(),
            definition.handler_config.clone(),
            handler,
        ))
    }
}
