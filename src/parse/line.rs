use crate::error::ParseError;
use crate::models::pool::DeviceNode;
use crate::models::vdev::DeviceState;

/// Decode `<name> <state> <read> <write> <cksum> [message]`.
pub fn decode_device_line(line: &str) -> Result<DeviceNode, ParseError> {
    let (tokens, rest) = leading_tokens(line, 5);
    if tokens.len() < 5 {
        return Err(ParseError::malformed(line, "5 fields (name state read write cksum)", tokens.len()));
    }

    let mut node = DeviceNode::new(tokens[0], DeviceState::classify(tokens[1]));
    node.read_errors     = parse_counter("read errors", tokens[2])?;
    node.write_errors    = parse_counter("write errors", tokens[3])?;
    node.checksum_errors = parse_counter("checksum errors", tokens[4])?;
    node.message         = message(rest);
    log::trace!("decoded device {} ({})", node.name, node.state.label());
    Ok(node)
}

/// Decode `<name> <state> [message]` from the spares section.
pub fn decode_spare_line(line: &str) -> Result<DeviceNode, ParseError> {
    let (tokens, rest) = leading_tokens(line, 2);
    if tokens.len() < 2 {
        return Err(ParseError::malformed(line, "2 fields (name state)", tokens.len()));
    }

    let mut node = DeviceNode::new(tokens[0], DeviceState::classify(tokens[1]));
    node.message = message(rest);
    Ok(node)
}

fn parse_counter(field: &'static str, token: &str) -> Result<u64, ParseError> {
    token.parse::<u64>().map_err(|_| ParseError::numeric(field, token))
}

fn message(rest: &str) -> Option<String> {
    Some(rest.trim()).filter(|m| !m.is_empty()).map(str::to_string)
}

/// Split off up to `n` whitespace-separated tokens; the remainder keeps its
/// inner spacing so free-text messages survive intact.
fn leading_tokens(line: &str, n: usize) -> (Vec<&str>, &str) {
    let mut tokens = Vec::with_capacity(n);
    let mut rest = line;
    while tokens.len() < n {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            return (tokens, "");
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        tokens.push(&trimmed[..end]);
        rest = &trimmed[end..];
    }
    (tokens, rest)
}
