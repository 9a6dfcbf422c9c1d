/// Block consumers, one module per block type
pub mod code;
pub mod figure;
pub mod heading;
pub mod html;
pub mod list;
pub mod paragraph;
pub mod quote;
pub mod reference;
pub mod rule;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ast::Block;
    use crate::flavor::{Flavor, FlavorKind};
    use crate::lines::split_lines;
    use crate::options::Options;
    use crate::parser::Context;

    /// Block-parse `text` with a flavor's stock rules
    pub fn blocks(kind: FlavorKind, text: &str) -> Vec<Block> {
        blocks_with(kind, Options::default(), text)
    }

    pub fn blocks_with(kind: FlavorKind, options: Options, text: &str) -> Vec<Block> {
        let flavor = Flavor::new(kind);
        let mut ctx = Context::new(&flavor, &options);
        ctx.parse_blocks(&split_lines(text)).unwrap()
    }
}
