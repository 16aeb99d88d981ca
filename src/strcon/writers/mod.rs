mod write_tsv;

pub use write_tsv::TsvWriter;
