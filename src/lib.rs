//! dolgen core library.
//!
//! Discovers C and C++ sources under a project tree and turns them into a
//! Ninja manifest that compiles each source to an object, links the objects
//! into an ELF executable, and converts that executable into a DOL image.
//!
//! The pipeline runs in three stages: [`config`] fixes the toolchain and
//! layout, [`ir`] discovers sources and builds a validated [`ir::BuildGraph`],
//! and [`ninja_gen`] renders the graph through the [`emitter`] contract.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod flags;
pub mod ir;
pub mod ninja_gen;
pub mod rules;
pub mod runner;
