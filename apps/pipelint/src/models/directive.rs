//! Directive schema: the closed set of process directive kinds.
//!
//! Every directive carries its source line and exactly one payload. The
//! payload is an explicit struct per kind holding only that kind's named
//! fields; the serialized form is tagged by `kind` using the directive's
//! pipeline spelling (`label`, `publishDir`, `maxForks`, ...).

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// A single directive attached to a process, with its source line.
pub struct Directive {
    pub line: usize,
    #[serde(flatten)]
    pub value: DirectiveValue,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        self.value.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
/// Kind-discriminated directive payload.
pub enum DirectiveValue {
    Accelerator(AcceleratorDirective),
    AfterScript(ScriptDirective),
    Arch(ArchDirective),
    Array(ArrayDirective),
    BeforeScript(ScriptDirective),
    Cache(CacheDirective),
    ClusterOptions(OptionsDirective),
    Conda(CondaDirective),
    Container(ContainerDirective),
    ContainerOptions(OptionsDirective),
    Cpus(CountDirective),
    Debug(ToggleDirective),
    Disk(DiskDirective),
    Dynamic(NamedDirective),
    Echo(ToggleDirective),
    ErrorStrategy(ErrorStrategyDirective),
    Executor(ExecutorDirective),
    Ext(ExtDirective),
    Fair(ToggleDirective),
    Label(LabelDirective),
    MachineType(MachineTypeDirective),
    MaxErrors(CountDirective),
    MaxForks(CountDirective),
    MaxRetries(CountDirective),
    MaxSubmitAwait(MaxSubmitAwaitDirective),
    Memory(MemoryDirective),
    Module(NamedDirective),
    Penv(PenvDirective),
    Pod(PodDirective),
    PublishDir(PublishDirDirective),
    Queue(NamedDirective),
    ResourceLabels(ResourceLabelsDirective),
    ResourceLimits(ResourceLimitsDirective),
    Scratch(ScratchDirective),
    Shell(ShellDirective),
    Spack(SpackDirective),
    StageInMode(ModeDirective),
    StageOutMode(ModeDirective),
    StoreDir(StoreDirDirective),
    Tag(TagDirective),
    Time(TimeDirective),
    Unknown(NamedDirective),
}

impl DirectiveValue {
    pub fn kind(&self) -> DirectiveKind {
        use DirectiveKind as K;
        match self {
            DirectiveValue::Accelerator(_) => K::Accelerator,
            DirectiveValue::AfterScript(_) => K::AfterScript,
            DirectiveValue::Arch(_) => K::Arch,
            DirectiveValue::Array(_) => K::Array,
            DirectiveValue::BeforeScript(_) => K::BeforeScript,
            DirectiveValue::Cache(_) => K::Cache,
            DirectiveValue::ClusterOptions(_) => K::ClusterOptions,
            DirectiveValue::Conda(_) => K::Conda,
            DirectiveValue::Container(_) => K::Container,
            DirectiveValue::ContainerOptions(_) => K::ContainerOptions,
            DirectiveValue::Cpus(_) => K::Cpus,
            DirectiveValue::Debug(_) => K::Debug,
            DirectiveValue::Disk(_) => K::Disk,
            DirectiveValue::Dynamic(_) => K::Dynamic,
            DirectiveValue::Echo(_) => K::Echo,
            DirectiveValue::ErrorStrategy(_) => K::ErrorStrategy,
            DirectiveValue::Executor(_) => K::Executor,
            DirectiveValue::Ext(_) => K::Ext,
            DirectiveValue::Fair(_) => K::Fair,
            DirectiveValue::Label(_) => K::Label,
            DirectiveValue::MachineType(_) => K::MachineType,
            DirectiveValue::MaxErrors(_) => K::MaxErrors,
            DirectiveValue::MaxForks(_) => K::MaxForks,
            DirectiveValue::MaxRetries(_) => K::MaxRetries,
            DirectiveValue::MaxSubmitAwait(_) => K::MaxSubmitAwait,
            DirectiveValue::Memory(_) => K::Memory,
            DirectiveValue::Module(_) => K::Module,
            DirectiveValue::Penv(_) => K::Penv,
            DirectiveValue::Pod(_) => K::Pod,
            DirectiveValue::PublishDir(_) => K::PublishDir,
            DirectiveValue::Queue(_) => K::Queue,
            DirectiveValue::ResourceLabels(_) => K::ResourceLabels,
            DirectiveValue::ResourceLimits(_) => K::ResourceLimits,
            DirectiveValue::Scratch(_) => K::Scratch,
            DirectiveValue::Shell(_) => K::Shell,
            DirectiveValue::Spack(_) => K::Spack,
            DirectiveValue::StageInMode(_) => K::StageInMode,
            DirectiveValue::StageOutMode(_) => K::StageOutMode,
            DirectiveValue::StoreDir(_) => K::StoreDir,
            DirectiveValue::Tag(_) => K::Tag,
            DirectiveValue::Time(_) => K::Time,
            DirectiveValue::Unknown(_) => K::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Payload-free discriminant of [`DirectiveValue`].
pub enum DirectiveKind {
    Accelerator,
    AfterScript,
    Arch,
    Array,
    BeforeScript,
    Cache,
    ClusterOptions,
    Conda,
    Container,
    ContainerOptions,
    Cpus,
    Debug,
    Disk,
    Dynamic,
    Echo,
    ErrorStrategy,
    Executor,
    Ext,
    Fair,
    Label,
    MachineType,
    MaxErrors,
    MaxForks,
    MaxRetries,
    MaxSubmitAwait,
    Memory,
    Module,
    Penv,
    Pod,
    PublishDir,
    Queue,
    ResourceLabels,
    ResourceLimits,
    Scratch,
    Shell,
    Spack,
    StageInMode,
    StageOutMode,
    StoreDir,
    Tag,
    Time,
    Unknown,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 42] = [
        DirectiveKind::Accelerator,
        DirectiveKind::AfterScript,
        DirectiveKind::Arch,
        DirectiveKind::Array,
        DirectiveKind::BeforeScript,
        DirectiveKind::Cache,
        DirectiveKind::ClusterOptions,
        DirectiveKind::Conda,
        DirectiveKind::Container,
        DirectiveKind::ContainerOptions,
        DirectiveKind::Cpus,
        DirectiveKind::Debug,
        DirectiveKind::Disk,
        DirectiveKind::Dynamic,
        DirectiveKind::Echo,
        DirectiveKind::ErrorStrategy,
        DirectiveKind::Executor,
        DirectiveKind::Ext,
        DirectiveKind::Fair,
        DirectiveKind::Label,
        DirectiveKind::MachineType,
        DirectiveKind::MaxErrors,
        DirectiveKind::MaxForks,
        DirectiveKind::MaxRetries,
        DirectiveKind::MaxSubmitAwait,
        DirectiveKind::Memory,
        DirectiveKind::Module,
        DirectiveKind::Penv,
        DirectiveKind::Pod,
        DirectiveKind::PublishDir,
        DirectiveKind::Queue,
        DirectiveKind::ResourceLabels,
        DirectiveKind::ResourceLimits,
        DirectiveKind::Scratch,
        DirectiveKind::Shell,
        DirectiveKind::Spack,
        DirectiveKind::StageInMode,
        DirectiveKind::StageOutMode,
        DirectiveKind::StoreDir,
        DirectiveKind::Tag,
        DirectiveKind::Time,
        DirectiveKind::Unknown,
    ];

    /// Directive name as written in pipeline sources.
    pub fn name(self) -> &'static str {
        match self {
            DirectiveKind::Accelerator => "accelerator",
            DirectiveKind::AfterScript => "afterScript",
            DirectiveKind::Arch => "arch",
            DirectiveKind::Array => "array",
            DirectiveKind::BeforeScript => "beforeScript",
            DirectiveKind::Cache => "cache",
            DirectiveKind::ClusterOptions => "clusterOptions",
            DirectiveKind::Conda => "conda",
            DirectiveKind::Container => "container",
            DirectiveKind::ContainerOptions => "containerOptions",
            DirectiveKind::Cpus => "cpus",
            DirectiveKind::Debug => "debug",
            DirectiveKind::Disk => "disk",
            DirectiveKind::Dynamic => "dynamic",
            DirectiveKind::Echo => "echo",
            DirectiveKind::ErrorStrategy => "errorStrategy",
            DirectiveKind::Executor => "executor",
            DirectiveKind::Ext => "ext",
            DirectiveKind::Fair => "fair",
            DirectiveKind::Label => "label",
            DirectiveKind::MachineType => "machineType",
            DirectiveKind::MaxErrors => "maxErrors",
            DirectiveKind::MaxForks => "maxForks",
            DirectiveKind::MaxRetries => "maxRetries",
            DirectiveKind::MaxSubmitAwait => "maxSubmitAwait",
            DirectiveKind::Memory => "memory",
            DirectiveKind::Module => "module",
            DirectiveKind::Penv => "penv",
            DirectiveKind::Pod => "pod",
            DirectiveKind::PublishDir => "publishDir",
            DirectiveKind::Queue => "queue",
            DirectiveKind::ResourceLabels => "resourceLabels",
            DirectiveKind::ResourceLimits => "resourceLimits",
            DirectiveKind::Scratch => "scratch",
            DirectiveKind::Shell => "shell",
            DirectiveKind::Spack => "spack",
            DirectiveKind::StageInMode => "stageInMode",
            DirectiveKind::StageOutMode => "stageOutMode",
            DirectiveKind::StoreDir => "storeDir",
            DirectiveKind::Tag => "tag",
            DirectiveKind::Time => "time",
            DirectiveKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DirectiveKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DirectiveKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownDirectiveKind {
                kind: s.to_string(),
                valid: DirectiveKind::ALL
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Simple,
    Ternary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Container image reference, either a plain name or a conditional pair.
pub struct ContainerDirective {
    pub format: ContainerFormat,
    #[serde(default)]
    pub simple_name: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub true_name: Option<String>,
    #[serde(default)]
    pub false_name: Option<String>,
}

impl ContainerDirective {
    /// Referenced image names: the simple name, or the true then false
    /// branch of a ternary. Absent and empty names are skipped.
    pub fn names(&self) -> Vec<&str> {
        let candidates = match self.format {
            ContainerFormat::Simple => [self.simple_name.as_deref(), None],
            ContainerFormat::Ternary => [self.true_name.as_deref(), self.false_name.as_deref()],
        };
        candidates
            .into_iter()
            .flatten()
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelDirective {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AcceleratorDirective {
    #[serde(default)]
    pub num_gpus: u32,
    #[serde(default)]
    pub gpu_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// `beforeScript` / `afterScript`.
pub struct ScriptDirective {
    #[serde(default)]
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ArchDirective {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ArrayDirective {
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CacheDirective {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub deep: bool,
    #[serde(default)]
    pub lenient: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// `clusterOptions` / `containerOptions`.
pub struct OptionsDirective {
    #[serde(default)]
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CondaDirective {
    /// Every value the directive may evaluate to, e.g. `bioconda::bcftools=1.14`.
    #[serde(default)]
    pub possible_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// `cpus`, `maxErrors`, `maxForks`, `maxRetries`.
pub struct CountDirective {
    #[serde(default)]
    pub num: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// `debug`, `echo`, `fair`.
pub struct ToggleDirective {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct DiskDirective {
    #[serde(default)]
    pub space: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// `module`, `queue`, and directives the parser could not resolve
/// (`dynamic`, `unknown`).
pub struct NamedDirective {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ErrorStrategyDirective {
    #[serde(default)]
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ExecutorDirective {
    #[serde(default)]
    pub executor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ExtDirective {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub args: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct MachineTypeDirective {
    #[serde(default)]
    pub machine_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct MaxSubmitAwaitDirective {
    #[serde(default)]
    pub max_submit_await: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MemoryDirective {
    #[serde(default)]
    pub memory_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PenvDirective {
    #[serde(default)]
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PodDirective {
    #[serde(default)]
    pub env: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PublishDirDirective {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub content_type: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub fail_on_error: Option<bool>,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ResourceLabelsDirective {
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ResourceLimitsDirective {
    #[serde(default)]
    pub cpus: Option<i64>,
    #[serde(default)]
    pub disk: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ScratchDirective {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ShellDirective {
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SpackDirective {
    #[serde(default)]
    pub dependencies: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// `stageInMode` / `stageOutMode`.
pub struct ModeDirective {
    #[serde(default)]
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct StoreDirDirective {
    #[serde(default)]
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TagDirective {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TimeDirective {
    #[serde(default)]
    pub duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names_round_trip_through_from_str() {
        for kind in DirectiveKind::ALL {
            assert_eq!(kind.name().parse::<DirectiveKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_lists_recognized_set() {
        let err = "cpu".parse::<DirectiveKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'cpu'"));
        assert!(msg.contains("cpus"));
        assert!(msg.contains("publishDir"));
        assert!(msg.contains("unknown"));
    }

    #[test]
    fn test_directive_kind_tag_matches_kind_name() {
        let d: Directive = serde_json::from_value(json!({
            "kind": "errorStrategy",
            "line": 7,
            "strategy": "retry"
        }))
        .unwrap();
        assert_eq!(d.line, 7);
        assert_eq!(d.kind(), DirectiveKind::ErrorStrategy);
        assert_eq!(d.kind().name(), "errorStrategy");
    }

    #[test]
    fn test_container_names_simple_and_ternary() {
        let simple = ContainerDirective {
            format: ContainerFormat::Simple,
            simple_name: Some("biocontainers/fastqc:0.11.9".into()),
            condition: None,
            true_name: None,
            false_name: None,
        };
        assert_eq!(simple.names(), vec!["biocontainers/fastqc:0.11.9"]);

        let empty = ContainerDirective {
            simple_name: None,
            ..simple.clone()
        };
        assert!(empty.names().is_empty());

        let ternary = ContainerDirective {
            format: ContainerFormat::Ternary,
            simple_name: Some("ignored".into()),
            condition: Some("workflow.containerEngine == 'singularity'".into()),
            true_name: Some("https://depot.galaxyproject.org/singularity/fastqc".into()),
            false_name: Some("biocontainers/fastqc".into()),
        };
        assert_eq!(
            ternary.names(),
            vec![
                "https://depot.galaxyproject.org/singularity/fastqc",
                "biocontainers/fastqc"
            ]
        );

        let half = ContainerDirective {
            true_name: None,
            ..ternary
        };
        assert_eq!(half.names(), vec!["biocontainers/fastqc"]);
    }

    #[test]
    fn test_unrecognized_container_format_is_rejected() {
        let res = serde_json::from_value::<Directive>(json!({
            "kind": "container",
            "line": 3,
            "format": "matrix",
            "simple_name": "ubuntu:22.04"
        }));
        assert!(res.is_err());
    }
}
