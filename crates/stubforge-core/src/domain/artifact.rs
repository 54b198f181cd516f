//! Artifact kinds and the scaffold settings registry.
//!
//! # Design
//!
//! Every generatable artifact is one [`ArtifactKind`] variant. Its defaults
//! (class suffix, namespace, template, output directory) live in exactly one
//! [`ArtifactDef`] entry of [`ARTIFACT_REGISTRY`]; its optional per-kind logic
//! lives in [`ArtifactKind::specialization`]. Callers never branch on the kind
//! themselves.
//!
//! # Adding New Kinds
//!
//! 1. Add the enum variant and its `type_key` / alias arms here
//! 2. Add one [`ArtifactDef`] entry to [`ARTIFACT_REGISTRY`]
//! 3. Ship a `<template_name>.stub` file under `templates/classes/`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{context::GenerationContext, error::DomainError};

// ── Artifact kind ────────────────────────────────────────────────────────────

/// Closed set of artifact type keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Task,
    TaskCrontab,
    CliCommand,
    EvtListener,
    HttpController,
    HttpMiddleware,
    WsModule,
    WsController,
    WsMiddleware,
    RpcController,
    RpcMiddleware,
    TcpController,
    TcpMiddleware,
    UserProcess,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 14] = [
        Self::Task,
        Self::TaskCrontab,
        Self::CliCommand,
        Self::EvtListener,
        Self::HttpController,
        Self::HttpMiddleware,
        Self::WsModule,
        Self::WsController,
        Self::WsMiddleware,
        Self::RpcController,
        Self::RpcMiddleware,
        Self::TcpController,
        Self::TcpMiddleware,
        Self::UserProcess,
    ];

    pub const fn type_key(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::TaskCrontab => "taskCrontab",
            Self::CliCommand => "cliCommand",
            Self::EvtListener => "evtListener",
            Self::HttpController => "httpController",
            Self::HttpMiddleware => "httpMiddleware",
            Self::WsModule => "wsModule",
            Self::WsController => "wsController",
            Self::WsMiddleware => "wsMiddleware",
            Self::RpcController => "rpcController",
            Self::RpcMiddleware => "rpcMiddleware",
            Self::TcpController => "tcpController",
            Self::TcpMiddleware => "tcpMiddleware",
            Self::UserProcess => "userProcess",
        }
    }

    /// Short command names accepted in place of the type key.
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Task => &[],
            Self::TaskCrontab => &["crontab", "task-crontab"],
            Self::CliCommand => &["command", "cmd"],
            Self::EvtListener => &["listener"],
            Self::HttpController => &["controller", "ctrl", "http-controller"],
            Self::HttpMiddleware => &["middleware", "mdl", "middle", "http-middleware"],
            Self::WsModule => &["ws-module", "wsm"],
            Self::WsController => &["ws-controller", "wsc"],
            Self::WsMiddleware => &["ws-middleware"],
            Self::RpcController => &["rpc-controller", "rpc-ctrl"],
            Self::RpcMiddleware => &["rpc-middleware"],
            Self::TcpController => &["tcp-controller"],
            Self::TcpMiddleware => &["tcp-middleware"],
            Self::UserProcess => &["process"],
        }
    }

    /// Reserved kinds are known keys without a registry entry.
    pub fn is_reserved(self) -> bool {
        definition(self).is_none()
    }

    /// Resolve the registry defaults for this kind.
    pub fn spec(self) -> Result<ArtifactSpec, DomainError> {
        definition(self)
            .map(ArtifactDef::to_spec)
            .ok_or_else(|| DomainError::UnknownArtifactType {
                type_key: self.type_key().to_owned(),
                reason: "reserved, not implemented yet".into(),
            })
    }

    /// Kind-specific context adjustment, run as the default after-collect hook.
    pub fn specialization(self) -> Option<Specialization> {
        match self {
            Self::HttpController => Some(specialize_http_controller),
            Self::WsModule | Self::WsController => Some(specialize_route_prefix),
            Self::CliCommand => Some(specialize_cli_command),
            _ => None,
        }
    }

    fn matches(self, input: &str) -> bool {
        self.type_key().eq_ignore_ascii_case(input)
            || self
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(input))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_key())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.matches(input))
            .ok_or_else(|| DomainError::UnknownArtifactType {
                type_key: input.to_owned(),
                reason: "unknown type key".into(),
            })
    }
}

/// Look up a type key (or alias) and return its registry defaults.
pub fn lookup(type_key: &str) -> Result<ArtifactSpec, DomainError> {
    type_key.parse::<ArtifactKind>()?.spec()
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Static defaults for one artifact kind.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactDef {
    pub kind: ArtifactKind,
    pub suffix: &'static str,
    pub namespace: &'static str,
    pub template_name: &'static str,
    pub output_dir: &'static str,
}

impl ArtifactDef {
    fn to_spec(&self) -> ArtifactSpec {
        ArtifactSpec {
            kind: self.kind,
            suffix: self.suffix.to_owned(),
            namespace: self.namespace.to_owned(),
            template_name: self.template_name.to_owned(),
            output_dir: self.output_dir.to_owned(),
        }
    }
}

/// Single source of truth for generation defaults.
///
/// `WsMiddleware` and `TcpMiddleware` are intentionally absent (reserved).
pub static ARTIFACT_REGISTRY: &[ArtifactDef] = &[
    ArtifactDef {
        kind: ArtifactKind::EvtListener,
        suffix: "Listener",
        namespace: "App\\Listener",
        template_name: "listener",
        output_dir: "app/Listener",
    },
    ArtifactDef {
        kind: ArtifactKind::CliCommand,
        suffix: "Command",
        namespace: "App\\Command",
        template_name: "command",
        output_dir: "app/Command",
    },
    ArtifactDef {
        kind: ArtifactKind::Task,
        suffix: "Task",
        namespace: "App\\Task",
        template_name: "task",
        output_dir: "app/Task",
    },
    ArtifactDef {
        kind: ArtifactKind::TaskCrontab,
        suffix: "Task",
        namespace: "App\\Task\\Crontab",
        template_name: "task-crontab",
        output_dir: "app/Task/Crontab",
    },
    ArtifactDef {
        kind: ArtifactKind::HttpController,
        suffix: "Controller",
        namespace: "App\\Http\\Controller",
        template_name: "http-rest-controller",
        output_dir: "app/Http/Controller",
    },
    ArtifactDef {
        kind: ArtifactKind::HttpMiddleware,
        suffix: "Middleware",
        namespace: "App\\Http\\Middleware",
        template_name: "http-middleware",
        output_dir: "app/Http/Middleware",
    },
    ArtifactDef {
        kind: ArtifactKind::WsModule,
        suffix: "Module",
        namespace: "App\\WebSocket",
        template_name: "ws-module",
        output_dir: "app/WebSocket",
    },
    ArtifactDef {
        kind: ArtifactKind::WsController,
        suffix: "Controller",
        namespace: "App\\WebSocket\\Controller",
        template_name: "ws-controller",
        output_dir: "app/WebSocket/Controller",
    },
    ArtifactDef {
        kind: ArtifactKind::RpcMiddleware,
        suffix: "Middleware",
        namespace: "App\\Rpc\\Middleware",
        template_name: "rpc-middleware",
        output_dir: "app/Rpc/Middleware",
    },
    ArtifactDef {
        kind: ArtifactKind::RpcController,
        suffix: "Controller",
        namespace: "App\\Rpc\\Service",
        template_name: "rpc-controller",
        output_dir: "app/Rpc/Controller",
    },
    ArtifactDef {
        kind: ArtifactKind::TcpController,
        suffix: "Controller",
        namespace: "App\\Tcp\\Controller",
        template_name: "tcp-controller",
        output_dir: "app/Tcp/Controller",
    },
    ArtifactDef {
        kind: ArtifactKind::UserProcess,
        suffix: "Process",
        namespace: "App\\Process",
        template_name: "process",
        output_dir: "app/Process",
    },
];

fn definition(kind: ArtifactKind) -> Option<&'static ArtifactDef> {
    ARTIFACT_REGISTRY.iter().find(|def| def.kind == kind)
}

// ── Spec + overrides ─────────────────────────────────────────────────────────

/// Generation parameters for one request: registry defaults plus overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSpec {
    #[serde(rename = "typeKey")]
    pub kind: ArtifactKind,
    pub suffix: String,
    pub namespace: String,
    pub template_name: String,
    pub output_dir: String,
}

impl ArtifactSpec {
    /// Apply CLI overrides. Unset or blank overrides keep the default.
    pub fn merge(&self, overrides: &ArtifactOverrides) -> ArtifactSpec {
        ArtifactSpec {
            kind: self.kind,
            suffix: pick(&overrides.suffix, &self.suffix),
            namespace: pick(&overrides.namespace, &self.namespace),
            template_name: pick(&overrides.template_name, &self.template_name),
            output_dir: pick(&overrides.output_dir, &self.output_dir),
        }
    }
}

fn pick(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_owned()
}

/// Values the user supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactOverrides {
    pub suffix: Option<String>,
    pub namespace: Option<String>,
    pub template_name: Option<String>,
    pub output_dir: Option<String>,
    /// Route prefix for controllers and websocket modules.
    pub prefix: Option<String>,
    /// `Some(false)` selects the plain (non-REST) HTTP controller.
    pub rest: Option<bool>,
}

impl ArtifactOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ── Specializations ──────────────────────────────────────────────────────────

/// Per-kind context adjustment.
pub type Specialization = fn(&mut GenerationContext, &ArtifactOverrides);

const PLAIN_HTTP_CONTROLLER: &str = "http-controller";

fn route_prefix(ctx: &GenerationContext, overrides: &ArtifactOverrides) -> String {
    overrides
        .prefix
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("/{}", ctx.name))
}

fn specialize_route_prefix(ctx: &mut GenerationContext, overrides: &ArtifactOverrides) {
    let prefix = route_prefix(ctx, overrides);
    ctx.set("prefix", prefix);
}

fn specialize_http_controller(ctx: &mut GenerationContext, overrides: &ArtifactOverrides) {
    specialize_route_prefix(ctx, overrides);
    ctx.set("idVar", "{id}");

    // An explicit --tpl-file always wins over the REST switch.
    if overrides.rest == Some(false) && overrides.template_name.is_none() {
        ctx.template_filename = PLAIN_HTTP_CONTROLLER.to_owned();
    }
}

fn specialize_cli_command(ctx: &mut GenerationContext, _overrides: &ArtifactOverrides) {
    ctx.set("commandVar", "{command}");
}
