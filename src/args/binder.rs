//! Binding raw tokens to typed argument values

use super::argument::{Argument, Value};
use super::list::ArgumentList;
use crate::error::ArgError;
use anyhow::Result;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};

/// Bound state of one argument slot
///
/// Presence is explicit, so a value like `0` or `""` counts as supplied.
enum Slot {
    Empty,
    Single(Value),
    Many(Vec<Value>),
}

/// Typed values produced by binding tokens against an `ArgumentList`
///
/// There is one slot per declared argument, addressed by id or by name.
/// Values are type-erased; accessors downcast to the type the argument's
/// parse function produced and return `None` on a type mismatch.
pub struct BoundArguments {
    slots: Vec<Slot>,
    names: Vec<Option<String>>,
}

impl BoundArguments {
    /// Number of bound values: one per non-rest slot plus one per rest value
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| match slot {
                Slot::Many(values) => values.len(),
                Slot::Empty | Slot::Single(_) => 1,
            })
            .sum()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of declared argument slots
    #[must_use]
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the slot holds at least one value
    #[must_use]
    #[inline]
    pub fn is_present(&self, id: usize) -> bool {
        match self.slots.get(id) {
            Some(Slot::Single(_)) => true,
            Some(Slot::Many(values)) => !values.is_empty(),
            Some(Slot::Empty) | None => false,
        }
    }

    /// Value of a single-valued slot
    #[must_use]
    #[inline]
    pub fn get<T: Any>(&self, id: usize) -> Option<&T> {
        match self.slots.get(id) {
            Some(Slot::Single(value)) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Values of a slot; a rest slot yields every absorbed value
    #[must_use]
    #[inline]
    pub fn get_many<T: Any>(&self, id: usize) -> Vec<&T> {
        match self.slots.get(id) {
            Some(Slot::Single(value)) => value.downcast_ref::<T>().into_iter().collect(),
            Some(Slot::Many(values)) => values
                .iter()
                .filter_map(|value| value.downcast_ref::<T>())
                .collect(),
            Some(Slot::Empty) | None => Vec::new(),
        }
    }

    /// Id of the argument declared with `name`
    #[must_use]
    #[inline]
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|declared| declared.as_deref() == Some(name))
    }

    #[must_use]
    #[inline]
    pub fn value_of<T: Any>(&self, name: &str) -> Option<&T> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    #[must_use]
    #[inline]
    pub fn values_of<T: Any>(&self, name: &str) -> Vec<&T> {
        self.id_of(name)
            .map(|id| self.get_many(id))
            .unwrap_or_default()
    }
}

impl fmt::Debug for BoundArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (slot, name) in self.slots.iter().zip(&self.names) {
            let name = name.as_deref().unwrap_or("?");
            match slot {
                Slot::Empty => list.entry(&format_args!("{name}: <empty>")),
                Slot::Single(_) => list.entry(&format_args!("{name}: <value>")),
                Slot::Many(values) => {
                    list.entry(&format_args!("{name}: <{} values>", values.len()))
                }
            };
        }
        list.finish()
    }
}

impl ArgumentList {
    /// Bind raw positional tokens against this list
    ///
    /// Tokens are bound in order: choices are checked, then the token is
    /// parsed. Arguments without a token fall back to their default. A rest
    /// argument absorbs every remaining token.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A token is not among its argument's choices (`ArgError::InvalidChoice`)
    /// - A required argument has no value (`ArgError::MissingRequired`)
    /// - There are more tokens than arguments (`ArgError::UnexpectedArguments`)
    /// - A parse function, choices supplier or default supplier fails; that
    ///   error is returned unchanged
    pub async fn bind(&self, tokens: Vec<String>) -> Result<BoundArguments> {
        debug!(
            "Binding {} tokens against {} arguments",
            tokens.len(),
            self.len()
        );

        let mut tokens = VecDeque::from(tokens);
        let mut slots = Vec::with_capacity(self.len());

        for argument in self {
            let slot = if argument.is_rest() {
                let mut values = Vec::with_capacity(tokens.len());
                for token in tokens.drain(..) {
                    values.push(bind_token(argument, token).await?);
                }
                if values.is_empty()
                    && let Some(value) = argument.default_value().await?
                {
                    values.push(value);
                }
                Slot::Many(values)
            } else if let Some(token) = tokens.pop_front() {
                Slot::Single(bind_token(argument, token).await?)
            } else {
                match argument.default_value().await? {
                    Some(value) => {
                        trace!("{argument} filled from its default");
                        Slot::Single(value)
                    }
                    None => Slot::Empty,
                }
            };
            slots.push(slot);
        }

        let missing: Vec<String> = self
            .iter()
            .zip(&slots)
            .filter(|(argument, slot)| argument.is_required() && matches!(slot, Slot::Empty))
            .map(|(argument, _)| argument.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ArgError::missing_required(missing).into());
        }

        if let Some(max) = self.max_tokens()
            && !tokens.is_empty()
        {
            debug!("{} tokens exceed the maximum of {max}", tokens.len());
            return Err(ArgError::unexpected_arguments(tokens.into()).into());
        }

        Ok(BoundArguments {
            slots,
            names: self
                .iter()
                .map(|argument| argument.name().map(str::to_owned))
                .collect(),
        })
    }
}

async fn bind_token(argument: &Argument, token: String) -> Result<Value> {
    if let Some(choices) = argument.choices() {
        let allowed = choices.resolve().await?;
        if !allowed.iter().any(|choice| *choice == token) {
            return Err(ArgError::invalid_choice(argument.to_string(), token, allowed).into());
        }
    }

    trace!("Parsing {argument} from '{token}'");
    argument.parse(token).await
}
