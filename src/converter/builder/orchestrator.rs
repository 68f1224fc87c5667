//! Main conversion orchestration.
//!
//! This module provides the [`Converter`] that drives a bundle through
//! validation, spec extraction, Dockerfile rendering and staging.

use crate::converter::{
    BuildContext, DockerfileRenderer, ImageDescriptor, OciBundle, Settings, Stager, spec,
};
use crate::error::{ConvertError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Steps of a conversion run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing checked yet.
    Start,
    /// The bundle directory exists.
    Validated,
    /// An image descriptor was derived from the bundle.
    Extracted,
    /// Dockerfile text was rendered.
    Rendered,
    /// The build context was written to disk.
    Staged,
    /// The report is ready.
    Done,
    /// The bundle was missing; usage guidance replaces conversion.
    HelpRequested,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Validated => "validated",
            Self::Extracted => "extracted",
            Self::Rendered => "rendered",
            Self::Staged => "staged",
            Self::Done => "done",
            Self::HelpRequested => "help-requested",
        };
        f.write_str(name)
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Values extracted from the bundle.
    pub descriptor: ImageDescriptor,
    /// Rendered Dockerfile text, as written into the context.
    pub dockerfile: String,
    /// The staged build context. Owned by the caller from here on.
    pub build_context: BuildContext,
    /// Non-fatal problems encountered while staging.
    pub warnings: Vec<String>,
}

impl ConversionReport {
    /// Suggested next command, using the entrypoint verbatim as the tag.
    pub fn suggested_command(&self) -> String {
        format!(
            "docker build -t {} {}",
            self.descriptor.entrypoint,
            self.build_context.path().display()
        )
    }
}

/// How a conversion run ended.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The build context was staged.
    Converted(Box<ConversionReport>),
    /// The bundle path is missing or not a directory; usage guidance should
    /// be shown instead. Nothing was written.
    HelpRequested {
        /// Path that failed validation.
        bundle: PathBuf,
    },
}

/// Conversion orchestrator.
///
/// # Examples
///
/// ```no_run
/// use oci2docker::converter::{Converter, Outcome, SettingsBuilder};
///
/// # async fn example() -> oci2docker::Result<()> {
/// let converter = Converter::new(SettingsBuilder::new().build())?;
///
/// match converter.convert("/bundles/app").await? {
///     Outcome::Converted(report) => println!("$ {}", report.suggested_command()),
///     Outcome::HelpRequested { bundle } => eprintln!("no bundle at {}", bundle.display()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    settings: Settings,
    renderer: DockerfileRenderer,
    stager: Stager,
}

impl Converter {
    /// Creates a converter with the given settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let renderer = DockerfileRenderer::new(settings.maintainer())?;
        let stager = Stager::new(&settings);
        Ok(Self {
            settings,
            renderer,
            stager,
        })
    }

    /// Returns a reference to the converter settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Converts the bundle at `bundle_path` into a new build context.
    ///
    /// A missing bundle yields [`Outcome::HelpRequested`] without touching
    /// the filesystem. Template problems are reported before anything is
    /// written; filesystem failures abort the run and leave any partial
    /// context in place.
    pub async fn convert<P: AsRef<Path>>(&self, bundle_path: P) -> Result<Outcome> {
        let bundle_path = bundle_path.as_ref();
        log::info!("converting OCI bundle {}", bundle_path.display());

        let bundle = match OciBundle::open(bundle_path) {
            Ok(bundle) => bundle,
            Err(ConvertError::InputNotFound { path }) => {
                transition(Stage::Start, Stage::HelpRequested);
                return Ok(Outcome::HelpRequested { bundle: path });
            }
            Err(e) => return Err(e),
        };
        transition(Stage::Start, Stage::Validated);

        let descriptor = spec::extract(bundle.path(), self.settings.defaults());
        transition(Stage::Validated, Stage::Extracted);

        let dockerfile = self.renderer.render(&descriptor.for_build_context())?;
        transition(Stage::Extracted, Stage::Rendered);

        let build_context = self.stager.stage(&bundle, &dockerfile).await?;
        transition(Stage::Rendered, Stage::Staged);

        let warnings = collect_warnings(&build_context);
        let report = ConversionReport {
            descriptor,
            dockerfile,
            build_context,
            warnings,
        };
        transition(Stage::Staged, Stage::Done);

        log::info!(
            "build context ready at {}",
            report.build_context.path().display()
        );
        Ok(Outcome::Converted(Box::new(report)))
    }
}

fn transition(from: Stage, to: Stage) {
    log::debug!("conversion {} -> {}", from, to);
}

fn collect_warnings(context: &BuildContext) -> Vec<String> {
    let copy = context.copy_report();
    let mut warnings: Vec<String> = copy
        .failures
        .iter()
        .map(|failure| format!("rootfs copy incomplete: {failure}"))
        .collect();

    warnings.extend(
        copy.skipped
            .iter()
            .map(|path| format!("skipped special file {}", path.display())),
    );

    if let Some(reason) = context.verification_error() {
        warnings.push(format!("rootfs not verified: {reason}"));
    }

    if let Some(digest) = context.digest().filter(|digest| !digest.matches()) {
        warnings.push(format!(
            "staged rootfs digest {} differs from source {}",
            digest.staged, digest.source
        ));
    }

    warnings
}
