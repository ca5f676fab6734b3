//! Command-driven navigation over a host-managed view stack.
//!
//! A producer sends ordered batches of [`Command`]s; a [`Navigator`] turns
//! each batch into push / pop / pop-to-marker calls on a [`StackHost`] and
//! keeps a private mirror of the stack's entry names in step with the host.

pub mod command;
pub mod config;
pub mod error;
pub mod holder;
pub mod host;
mod mirror;
pub mod navigator;
pub mod policy;
pub mod protocol;
pub mod screen;
pub mod slint_stack;

pub use crate::command::Command;
pub use crate::config::HostConfig;
pub use crate::error::{BatchError, HostError, NavError};
pub use crate::holder::{CommandBuffer, CommandSink, NavigatorHolder};
pub use crate::host::{LaunchOptions, StackHost, TransitionStyle, UnitHost, ViewFactory};
pub use crate::navigator::Navigator;
pub use crate::policy::{BackToFallback, DefaultPolicy, ErrorAction, NavigationPolicy, RootExit};
pub use crate::protocol::{
    HOST_TO_PRODUCER_CAP, HostEnvelope, PRODUCER_TO_HOST_CAP, ProducerEnvelope,
};
pub use crate::screen::{Destination, LaunchSpec, Screen, ViewSpec};
pub use crate::slint_stack::{SlintStackHost, StackEntry, ViewRegistry};
pub use serde_json;
