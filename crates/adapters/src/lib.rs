// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! secauto-adapters: the only crate allowed to spawn processes or make
//! outbound HTTP calls.
//!
//! Provides concrete backends for the `Executor`/`PluginExecutor` traits
//! declared in `secauto-rules` (subprocess, in-process/mock), plus the
//! `WebhookEmitter` trait and its HTTP implementation. Sandboxing,
//! hot-reload, and cross-platform binary loading are explicitly out of
//! scope — a backend here is a thin, opaque collaborator.

pub mod mock;
pub mod playbook;
pub mod subprocess;
pub mod webhook;

pub use mock::MockExecutor;
pub use playbook::{FilesystemPlaybookSource, NoPlaybooks};
pub use subprocess::{SubprocessExecutor, SubprocessPluginExecutor};
pub use webhook::{HttpWebhookEmitter, NullWebhookEmitter, WebhookEmitter, WebhookEvent, WebhookEventType};
