//! Document map to XML serialization.
//!
//! This module renders a [`DocumentMap`](crate::DocumentMap) back to XML
//! text. Metadata stored under the reserved keys of a
//! [`KeySpace`](crate::KeySpace) drives the output: attributes become
//! attribute pairs, comments become `<!-- -->` blocks and the text key
//! becomes character data. Every other key names a child element.

pub mod xml;

pub use xml::{
    escape, inner_xml, render_node, render_node_with_options, to_xml, to_xml_with_options,
    SerializeOptions,
};
