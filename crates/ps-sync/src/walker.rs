//! Line-by-line walk of a source path against its compiled elements.

use std::iter::Enumerate;
use std::str::Lines;

use ps_directive::DirectiveKind;
use ps_model::{PathElement, split_comment};

use crate::DirectiveError;

// ── PathWalker ────────────────────────────────────────────────────────────────

/// One physical line of a source path.
#[derive(Clone, Debug)]
pub struct WalkedLine<'a> {
    /// 1-based.
    pub number:   usize,
    pub text:     &'a str,
    /// Text after the first unescaped `'`.
    pub comment:  Option<&'a str>,
    /// Elements compiled from this line, in path order.
    pub elements: &'a [PathElement],
}

/// Pairs each source line with the elements compiled from it.
///
/// A single cursor moves forward through `elements`; each element is looked
/// at once over the whole walk.  Elements whose line number is behind the
/// current line are passed over.
pub struct PathWalker<'a> {
    lines:    Enumerate<Lines<'a>>,
    elements: &'a [PathElement],
    cursor:   usize,
}

impl<'a> PathWalker<'a> {
    pub fn new(text: &'a str, elements: &'a [PathElement]) -> Self {
        Self { lines: text.lines().enumerate(), elements, cursor: 0 }
    }
}

impl<'a> Iterator for PathWalker<'a> {
    type Item = WalkedLine<'a>;

    fn next(&mut self) -> Option<WalkedLine<'a>> {
        let (index, text) = self.lines.next()?;
        let number = index + 1;

        while self.elements.get(self.cursor).is_some_and(|e| e.line < number) {
            self.cursor += 1;
        }
        let start = self.cursor;
        while self.elements.get(self.cursor).is_some_and(|e| e.line == number) {
            self.cursor += 1;
        }

        let (_, comment) = split_comment(text);
        Some(WalkedLine { number, text, comment, elements: &self.elements[start..self.cursor] })
    }
}

// ── EnableGate ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GateState {
    /// No `enable` seen yet; directives are an error.
    Closed,
    Open,
    /// `disable` seen; directives are ignored.
    Disabled,
}

/// Per-path enable/disable switch.
#[derive(Clone, Debug)]
pub struct EnableGate {
    state: GateState,
}

impl EnableGate {
    /// With `required = false` the gate starts open.
    pub fn new(required: bool) -> Self {
        Self { state: if required { GateState::Closed } else { GateState::Open } }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Feed one recognised directive.
    ///
    /// `Ok(true)` means interpret it.  Gate directives switch state and
    /// return `Ok(false)`, as do directives after a `disable`.
    pub fn admit(&mut self, kind: DirectiveKind) -> Result<bool, DirectiveError> {
        match kind {
            DirectiveKind::Enable => {
                self.state = GateState::Open;
                Ok(false)
            }
            DirectiveKind::Disable => {
                self.state = GateState::Disabled;
                Ok(false)
            }
            _ => match self.state {
                GateState::Open => Ok(true),
                GateState::Disabled => Ok(false),
                GateState::Closed => Err(DirectiveError::Gate { directive: kind.name() }),
            },
        }
    }
}
