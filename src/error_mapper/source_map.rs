use sourcemap::SourceMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceMapError {
  #[error("could not load source map module `{0}`")]
  Missing(String),
  #[error("source map is not valid: {0}")]
  Parse(#[from] sourcemap::Error),
}

/// Where a position in the bundle came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
  pub source: String,
  /// 1-based.
  pub line: u32,
  /// 0-based.
  pub column: u32,
  /// Original symbol name, when the map records one.
  pub name: Option<String>,
}

/// Something that can answer "where did this bundle position come from".
pub trait PositionLookup {
  /// `line` and `column` are taken straight from a stack frame: the line is
  /// 1-based, the column is used as is.
  fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition>;
}

pub fn parse_source_map(json: &[u8]) -> Result<SourceMap, SourceMapError> {
  Ok(SourceMap::from_slice(json)?)
}

impl PositionLookup for SourceMap {
  fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition> {
    let dst_line = line.checked_sub(1)?;
    let token = self.lookup_token(dst_line, column)?;
    // only match mappings on the frame's own line
    if token.get_dst_line() != dst_line {
      return None;
    }
    let source = token.get_source()?;
    Some(OriginalPosition {
      source: source.to_string(),
      line: token.get_src_line() + 1,
      column: token.get_src_col(),
      name: token.get_name().map(str::to_string),
    })
  }
}
