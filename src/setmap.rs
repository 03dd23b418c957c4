// SetMap extraction pipeline
//
// The portal's map page inlines one SetMap(...) call per station. This
// module owns everything between raw page text and a parsed StationRecord:
// - tokenizer: top-level comma split of a call's argument list
// - literal: token -> string | number | object coercion
// - info: labeled-field extraction from the per-station info blob
// - extractor: call scanning, positional field mapping, enrichment

pub mod extractor;
pub mod info;
pub mod literal;
pub mod tokenizer;

pub use extractor::StationRecord;
pub use literal::Value;
