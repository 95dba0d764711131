use indextree::{Arena, NodeId};
use memchr::memchr2_iter;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetParseError {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    ParseError(#[from] TreeParseError),
}

pub type LabelId = i32;

/// Maps label strings to dense ids, shared across a whole collection.
pub type LabelDict = HashMap<String, LabelId>;
pub type ParsedTree = Arena<LabelId>;

/// Parses a dataset file with one bracket notation tree per line.
/// Tree ids are the 0-based line positions.
pub fn parse_dataset(
    dataset_file: PathBuf,
    label_dict: &mut LabelDict,
) -> Result<Vec<ParsedTree>, DatasetParseError> {
    let f = File::open(dataset_file)?;
    let reader = BufReader::new(f);
    let trees: Vec<ParsedTree> = reader
        .lines()
        .map(|l| parse_tree(l, label_dict))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(trees)
}

const TOKEN_START: u8 = b'{';
const TOKEN_END: u8 = b'}';
const ESCAPE_CHAR: u8 = b'\\';

#[inline(always)]
fn is_escaped(byte_string: &[u8], offset: usize) -> bool {
    offset > 0 && byte_string[offset - 1] == ESCAPE_CHAR
}

#[derive(Error, Debug)]
pub enum TreeParseError {
    #[error("tree string contains non ascii characters")]
    IsNotAscii,
    #[error(transparent)]
    LineReadError(#[from] io::Error),
    #[error("tree string has incorrect bracket notation format: {}", .0)]
    IncorrectFormat(String),
    #[error("Bad tokenizing")]
    TokenizerError,
}

fn intern_label(label_map: &mut LabelDict, label: String) -> LabelId {
    let next_id = label_map.len() as LabelId;
    *label_map.entry(label).or_insert(next_id)
}

/// Parses a single tree in bracket notation, e.g. `{a{b}{c}}`.
/// Braces inside labels must be escaped with a backslash.
pub fn parse_tree(
    tree_str: Result<String, io::Error>,
    label_map: &mut LabelDict,
) -> Result<ParsedTree, TreeParseError> {
    use TreeParseError as TPE;

    let tree_str = tree_str?;
    if !tree_str.is_ascii() {
        return Err(TPE::IsNotAscii);
    }
    let mut tree = ParsedTree::new();
    let tree_bytes = tree_str.as_bytes();

    let token_positions: Vec<usize> = memchr2_iter(TOKEN_START, TOKEN_END, tree_bytes)
        .filter(|char_pos| !is_escaped(tree_bytes, *char_pos))
        .collect();

    if token_positions.len() < 2 {
        return Err(TPE::IncorrectFormat(
            "Minimal of 2 brackets not found!".to_owned(),
        ));
    }

    let mut node_stack: Vec<NodeId> = vec![];
    let mut tokens = token_positions.iter().peekable();

    while let Some(token) = tokens.next() {
        match tree_bytes[*token] {
            TOKEN_START => {
                let Some(token_end) = tokens.peek() else {
                    let err_msg =
                        format!("Label has no ending token near col {token} , line \"{tree_str}\"");
                    return Err(TPE::IncorrectFormat(err_msg));
                };
                let label =
                    String::from_utf8(tree_bytes[(*token + 1)..**token_end].to_vec()).unwrap();
                let label_id = intern_label(label_map, label);
                let n = tree.new_node(label_id);
                if let Some(parent) = node_stack.last() {
                    parent.append(n, &mut tree);
                } else if tree.count() > 1 {
                    let err_msg = format!("Multiple roots on line \"{tree_str}\"");
                    return Err(TPE::IncorrectFormat(err_msg));
                }
                node_stack.push(n);
            }
            TOKEN_END => {
                let Some(_) = node_stack.pop() else {
                    return Err(TPE::IncorrectFormat("Wrong bracket pairing".to_owned()));
                };
            }
            _ => return Err(TPE::TokenizerError),
        }
    }

    Ok(tree)
}
