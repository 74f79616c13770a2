pub mod dbinfo;
pub mod getseq;
pub mod makedb;
pub mod search;
