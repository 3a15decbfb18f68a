//! A PAQ8HP-family context mixing compressor.
//!
//! The core is a bit-level predictor: before each bit it produces a 12
//! bit probability that the bit is a 1, and after each bit it is
//! trained with the true value. An arithmetic coder turns the
//! probability stream into near-entropy output for English-like text.
//!
//! ```no_run
//! use paqhp::{Encoder, Decoder};
//!
//! let data = b"the quick brown fox jumps over the lazy dog";
//! let stream = Encoder::new(5).encode(data);
//!
//! let out = Decoder::new(stream).unwrap().decode();
//! assert_eq!(out, data);
//! ```
mod apm;
mod buffer;
mod coder;
mod config;
mod constant;
mod context;
mod context_map;
mod context_model;
mod error;
mod hash;
mod hash_table;
mod ilog;
mod logistic;
mod match_model;
mod mixer;
mod predictor;
mod rnd;
mod record_model;
mod run_map;
mod small_map;
mod sparse_model;
mod statemap;
mod tables;
mod word_model;

pub use crate::{
    coder::{Decoder, Encoder},
    config::{Config, Mode},
    constant::{MAGIC, Version},
    context::Context,
    error::{CodecError, ConfigError},
    predictor::Predictor,
};
