// Copyright 2025 Distill (https://github.com/distill-kb/distill)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core domain types for the distill concept extractor.
//!
//! Everything in this crate is plain data: the canonical [`Concept`] record,
//! the request-scoped conversation types, and the static category taxonomy.
//! No I/O happens here.

pub mod concept;
pub mod conversation;
pub mod taxonomy;

pub use concept::{
    AnalysisMetadata, AnalysisResult, CodeSnippet, Concept, ExtractionMethod,
};
pub use conversation::{
    CategoryGuidance, ConversationInput, DomainType, Segment, SegmentKind,
};
