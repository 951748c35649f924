#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    LineComment,
    BlockComment,
}

/// Closing byte for a quoted state, if the state is quoted.
pub(super) fn closing_quote(state: State) -> Option<u8> {
    match state {
        State::SingleQuoted => Some(b'\''),
        State::DoubleQuoted => Some(b'"'),
        State::Backticked => Some(b'`'),
        _ => None,
    }
}
