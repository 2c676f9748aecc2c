//! Podcast asset pipelines.
//!
//! Generates a narrated podcast clip and a thumbnail through an external
//! AI service, uploads both to managed storage and resolves the URLs the
//! podcast form plays and displays.
//!
//! * [`config`] — TOML settings for both remote services.
//! * [`generation`] — text-to-speech / text-to-image client.
//! * [`asset`] — packaging bytes into named, typed files.
//! * [`storage`] — upload targets, uploads and URL resolution.
//! * [`notify`] — user-facing notification sinks.
//! * [`pipeline`] — the audio and image pipelines and their state.
//! * [`form`] — the asset fields the owning form submits.

pub mod asset;
pub mod config;
pub mod form;
pub mod generation;
pub mod notify;
pub mod pipeline;
pub mod storage;
