//! Contains the main `run()` function of the applicability checker.
//!
//! The driver reads a [`model::Model`], builds the type catalog and the
//! constraint table it describes, checks every custom constraint kind for
//! structural errors, and diagnoses every declaration placed on a site.

use std::{
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use applica_constraint::{
    ConstraintDeclaration, ConstraintKind, ConstraintTable, Site,
};
use applica_diagnostic::{Diagnostic, Report as _, Severity};
use applica_handler::Storage;
use applica_resolution::{
    CompositionGraph, InternalError, Resolver, StructuralError, ValidatorRegistry,
};
use applica_type_catalog::{parse::ParseError, BuildError};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

pub mod lower;
pub mod model;
pub mod print;

use model::Model;

/// The output format of the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum,
)]
pub enum Format {
    /// Colored diagnostics meant to be read by a human.
    #[clap(name = "human")]
    Human,

    /// The report serialized as RON.
    #[clap(name = "ron")]
    Ron,
}

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "applica",
    about = "Checks which validators apply to constraint declarations",
    author = "Simmypeet"
)]
pub struct Arguments {
    /// The model file to check.
    pub file: PathBuf,

    /// Starts from an empty type catalog and no built-in constraint kinds.
    #[clap(long)]
    pub no_builtins: bool,

    /// The number of threads diagnosing the sites. Defaults to the available
    /// parallelism.
    #[clap(short, long)]
    pub jobs: Option<NonZeroUsize>,

    /// Specifies the output format of the report.
    #[clap(short, long, default_value = "human")]
    pub format: Format,

    /// Logs every resolution step.
    #[clap(short, long)]
    pub verbose: bool,
}

/// An error that stops the check before a report is produced.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed model: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("invalid type `{source_text}` in {context}: {error}")]
    Type {
        source_text: String,
        context: String,
        #[source]
        error: ParseError,
    },

    #[error("`{0}` is not a constraint target")]
    UnknownConstraintTarget(String),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Tunes how a model is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Options {
    /// Whether the standard library types and the built-in constraint kinds
    /// are available.
    pub builtins: bool,

    /// The number of threads diagnosing the sites.
    pub jobs: NonZeroUsize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            builtins: true,
            jobs: std::thread::available_parallelism()
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// The diagnostics of a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteReport {
    /// The name of the site.
    pub site: String,

    /// The issues of every declaration placed on the site, in declaration
    /// order.
    pub diagnostics: Vec<Diagnostic>,
}

/// The outcome of checking a model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Report {
    /// The structural errors of the constraint kinds.
    pub kinds: Vec<Diagnostic>,

    /// The diagnostics of every site, in model order.
    pub sites: Vec<SiteReport>,
}

impl Report {
    /// Counts the diagnostics of the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.kinds
            .iter()
            .chain(self.sites.iter().flat_map(|x| x.diagnostics.iter()))
            .filter(|x| x.severity == severity)
            .count()
    }

    /// Counts the error diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize { self.count(Severity::Error) }
}

type LoweredSite = (String, Site, Vec<ConstraintDeclaration>);

/// Checks a model.
///
/// # Errors
///
/// Returns an [`Error`] if the model can't be lowered or a collaborator
/// invariant is violated while resolving.
pub fn check_model(model: &Model, options: Options) -> Result<Report, Error> {
    let catalog = lower::catalog(model, options.builtins)?;

    let mut table = if options.builtins {
        ConstraintTable::with_builtins(&catalog)
    } else {
        ConstraintTable::new()
    };

    for kind in &model.kinds {
        if !table.insert(lower::definition(&catalog, kind)?) {
            log::warn!(
                "`@{}` is defined more than once; keeping the first definition",
                kind.name
            );
        }
    }

    log::info!(
        "{} type(s) and {} constraint kind(s) available",
        catalog.definitions().len(),
        table.len()
    );

    let sites = model
        .sites
        .iter()
        .map(|x| {
            lower::site(&catalog, x)
                .map(|(site, declarations)| (x.name.clone(), site, declarations))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let table = Arc::new(table);
    let registry = if options.builtins {
        ValidatorRegistry::with_builtins(table.clone(), &catalog)?
    } else {
        ValidatorRegistry::new(table.clone())
    };
    let graph = CompositionGraph::new(table);
    let storage = Storage::<StructuralError>::new();
    let resolver = Resolver::new(&catalog, &registry, &graph, &storage);

    for kind in &model.kinds {
        resolver.well_formedness(&ConstraintKind::new(&kind.name))?;
    }

    let sites = diagnose_sites(&resolver, &sites, options.jobs)?;

    log::info!("diagnosed {} site(s)", sites.len());

    std::mem::drop(resolver);

    let kinds =
        storage.into_vec().iter().map(|x| x.report(&catalog)).collect();

    Ok(Report { kinds, sites })
}

/// Parses the model source and checks it.
///
/// # Errors
///
/// See [`check_model`].
pub fn check_source(source: &str, options: Options) -> Result<Report, Error> {
    let model: Model = ron::from_str(source)?;

    log::info!(
        "loaded {} type(s), {} kind(s), and {} site(s)",
        model.types.len(),
        model.kinds.len(),
        model.sites.len()
    );

    check_model(&model, options)
}

fn diagnose_sites(
    resolver: &Resolver,
    sites: &[LoweredSite],
    jobs: NonZeroUsize,
) -> Result<Vec<SiteReport>, InternalError> {
    let chunk_size = sites.len().div_ceil(jobs.get()).max(1);

    std::thread::scope(|scope| {
        let handles = sites
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|x| diagnose_site(resolver, x))
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect::<Vec<_>>();

        let mut reports = Vec::with_capacity(sites.len());

        for handle in handles {
            let chunk = handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))?;

            reports.extend(chunk);
        }

        Ok(reports)
    })
}

fn diagnose_site(
    resolver: &Resolver,
    (name, site, declarations): &LoweredSite,
) -> Result<SiteReport, InternalError> {
    let mut diagnostics = Vec::new();

    for declaration in declarations {
        diagnostics.extend(
            resolver
                .diagnose(site, declaration)?
                .iter()
                .map(|x| x.report(resolver.catalog())),
        );
    }

    Ok(SiteReport { site: name.clone(), diagnostics })
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(argument: Arguments) -> ExitCode {
    let source = match std::fs::read_to_string(&argument.file) {
        Ok(source) => source,
        Err(source) => {
            let error = Error::Io { path: argument.file, source };
            print::log(Severity::Error, &error.to_string());
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        builtins: !argument.no_builtins,
        jobs: argument.jobs.unwrap_or_else(|| Options::default().jobs),
    };

    let report = match check_source(&source, options) {
        Ok(report) => report,
        Err(error) => {
            print::log(Severity::Error, &error.to_string());
            return ExitCode::FAILURE;
        }
    };

    match argument.format {
        Format::Human => print::report(&report),
        Format::Ron => {
            match ron::ser::to_string_pretty(&report, PrettyConfig::new()) {
                Ok(serialized) => println!("{serialized}"),
                Err(error) => {
                    print::log(
                        Severity::Error,
                        &format!("failed to serialize the report: {error}"),
                    );
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if report.error_count() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
