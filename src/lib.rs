//#![warn(missing_docs)]

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod timestamp;

pub mod tlv;

pub mod name;

pub mod face;

pub mod flags;

pub mod tables;

pub mod strategy;
