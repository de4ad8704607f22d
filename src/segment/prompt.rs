//! Instruction text for the segmentation request

/// Instruction prepended to the pasted script. The script itself is appended
/// after this text; the response schema additionally constrains the output
/// to a JSON array of {character, text} objects.
pub const SEGMENT_PROMPT: &str = "\
Split the following scene text into characters and their spoken lines, \
in original reading order. Character names are usually written in CAPITAL \
LETTERS. Return the result as a JSON array of objects with exactly the \
fields 'character' and 'text'.

Text to parse:
";
