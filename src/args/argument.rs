//! Argument definitions and typed argument families
//!
//! An [`Argument`] describes one positional slot. Arguments are built from an
//! [`ArgKind`], a family of constructors sharing one parse function and a set
//! of default options, so that e.g. every path argument expands `~` the same
//! way without repeating the parser.

use crate::utils::expand_home;
use anyhow::{Result, anyhow};
use futures::future::{BoxFuture, FutureExt as _};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Type-erased value produced by an argument's parse function
pub type Value = Box<dyn Any + Send + Sync>;

type ParseFn<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<T>> + Send + Sync>;
type DefaultFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<Option<T>>> + Send + Sync>;
type ChoicesFn = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<String>>> + Send + Sync>;

/// Allowed raw values for an argument
///
/// Lazy choices are resolved every time a token is bound, never when the
/// argument is declared.
#[derive(Clone)]
pub struct Choices {
    source: ChoiceSource,
}

#[derive(Clone)]
enum ChoiceSource {
    Fixed(Vec<String>),
    Supplier(ChoicesFn),
}

impl Choices {
    /// A fixed set of allowed values
    #[inline]
    pub fn fixed<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: ChoiceSource::Fixed(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Allowed values computed by a synchronous supplier at bind time
    #[inline]
    pub fn lazy<F>(supplier: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        let resolve: ChoicesFn = Arc::new(move || {
            let values = supplier();
            async move { Ok(values) }.boxed()
        });
        Self {
            source: ChoiceSource::Supplier(resolve),
        }
    }

    /// Allowed values computed by an asynchronous, fallible supplier at bind time
    #[inline]
    pub fn lazy_async<F, Fut>(supplier: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<String>>> + Send + 'static,
    {
        let resolve: ChoicesFn = Arc::new(move || supplier().boxed());
        Self {
            source: ChoiceSource::Supplier(resolve),
        }
    }

    /// Resolve the allowed values, invoking the supplier if there is one
    ///
    /// # Errors
    ///
    /// Returns whatever error the supplier fails with.
    #[inline]
    pub async fn resolve(&self) -> Result<Vec<String>> {
        match &self.source {
            ChoiceSource::Fixed(values) => Ok(values.clone()),
            ChoiceSource::Supplier(supplier) => supplier().await,
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for Choices {
    #[inline]
    fn from(values: Vec<S>) -> Self {
        Self::fixed(values)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Choices {
    #[inline]
    fn from(values: [S; N]) -> Self {
        Self::fixed(values)
    }
}

impl fmt::Debug for Choices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ChoiceSource::Fixed(values) => f.debug_tuple("Fixed").field(values).finish(),
            ChoiceSource::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

/// Options record for one argument
///
/// Every field is optional. When an argument is built from an [`ArgKind`],
/// the fields set here override the family's defaults one by one.
pub struct ArgOptions<T> {
    name: Option<String>,
    description: Option<String>,
    hidden: Option<bool>,
    parse: Option<ParseFn<T>>,
    choices: Option<Choices>,
    default: Option<DefaultFn<T>>,
}

impl<T> ArgOptions<T> {
    /// Empty options
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            description: None,
            hidden: None,
            parse: None,
            choices: None,
            default: None,
        }
    }

    /// Options with only a name set
    #[inline]
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self::new().name(name)
    }

    #[must_use]
    #[inline]
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    #[inline]
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Leave the argument out of usage and help text
    #[must_use]
    #[inline]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Restrict the raw tokens this argument accepts
    #[must_use]
    #[inline]
    pub fn choices<C: Into<Choices>>(mut self, choices: C) -> Self {
        self.choices = Some(choices.into());
        self
    }

    /// Field-wise merge, values set in `overrides` win
    fn merge(self, overrides: Self) -> Self {
        Self {
            name: overrides.name.or(self.name),
            description: overrides.description.or(self.description),
            hidden: overrides.hidden.or(self.hidden),
            parse: overrides.parse.or(self.parse),
            choices: overrides.choices.or(self.choices),
            default: overrides.default.or(self.default),
        }
    }
}

impl<T: Send + 'static> ArgOptions<T> {
    /// Replace the parse function with a synchronous one
    #[must_use]
    #[inline]
    pub fn parse<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Result<T> + Send + Sync + 'static,
    {
        self.parse = Some(sync_parser(parse));
        self
    }

    /// Replace the parse function with an asynchronous one
    #[must_use]
    #[inline]
    pub fn parse_async<F, Fut>(mut self, parse: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let parser: ParseFn<T> = Arc::new(move |raw: String| parse(raw).boxed());
        self.parse = Some(parser);
        self
    }

    /// Use a constant when no token is supplied
    ///
    /// The constant is wrapped into a supplier here, so binding only ever
    /// deals with suppliers.
    #[must_use]
    #[inline]
    pub fn default_value(mut self, value: T) -> Self
    where
        T: Clone + Sync,
    {
        let constant: DefaultFn<T> = Arc::new(move || {
            let value = value.clone();
            async move { Ok(Some(value)) }.boxed()
        });
        self.default = Some(constant);
        self
    }

    /// Compute the value when no token is supplied
    ///
    /// Resolving to `None` leaves the slot empty.
    #[must_use]
    #[inline]
    pub fn default_with<F, Fut>(mut self, supplier: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>>> + Send + 'static,
    {
        let computed: DefaultFn<T> = Arc::new(move || supplier().boxed());
        self.default = Some(computed);
        self
    }
}

impl<T> Default for ArgOptions<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ArgOptions<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            hidden: self.hidden,
            parse: self.parse.clone(),
            choices: self.choices.clone(),
            default: self.default.clone(),
        }
    }
}

impl<T> From<&str> for ArgOptions<T> {
    #[inline]
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl<T> From<String> for ArgOptions<T> {
    #[inline]
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl<T> From<(&str, &str)> for ArgOptions<T> {
    #[inline]
    fn from((name, description): (&str, &str)) -> Self {
        Self::named(name).description(description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Required,
    Optional,
    Rest,
}

/// A family of argument constructors sharing a parse function and defaults
pub struct ArgKind<T> {
    parse: ParseFn<T>,
    defaults: ArgOptions<T>,
}

impl<T> Clone for ArgKind<T> {
    fn clone(&self) -> Self {
        Self {
            parse: Arc::clone(&self.parse),
            defaults: self.defaults.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> ArgKind<T> {
    /// Create a family around a synchronous parse function
    #[inline]
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            parse: sync_parser(parse),
            defaults: ArgOptions::new(),
        }
    }

    /// Derive a new family whose defaults are overridden by `overrides`
    ///
    /// `self` is left untouched, so sibling families stay independent.
    #[must_use]
    #[inline]
    pub fn extend(&self, overrides: ArgOptions<T>) -> Self {
        Self {
            parse: Arc::clone(&self.parse),
            defaults: self.defaults.clone().merge(overrides),
        }
    }

    /// Declare an argument that must be supplied (or defaulted)
    #[inline]
    pub fn required<O: Into<ArgOptions<T>>>(&self, options: O) -> Argument {
        self.build(options.into(), Shape::Required)
    }

    /// Declare an argument that may be left out
    #[inline]
    pub fn optional<O: Into<ArgOptions<T>>>(&self, options: O) -> Argument {
        self.build(options.into(), Shape::Optional)
    }

    /// Declare a trailing argument absorbing every remaining token
    #[inline]
    pub fn rest<O: Into<ArgOptions<T>>>(&self, options: O) -> Argument {
        self.build(options.into(), Shape::Rest)
    }

    fn build(&self, options: ArgOptions<T>, shape: Shape) -> Argument {
        let options = self.defaults.clone().merge(options);
        let parse = options.parse.unwrap_or_else(|| Arc::clone(&self.parse));

        Argument {
            id: None,
            name: options.name,
            description: options.description,
            required: shape == Shape::Required,
            rest: shape == Shape::Rest,
            hidden: options.hidden.unwrap_or(false),
            parse: erase_parser(parse),
            choices: options.choices,
            default: options.default.map(erase_default),
        }
    }
}

fn sync_parser<T, F>(parse: F) -> ParseFn<T>
where
    T: Send + 'static,
    F: Fn(&str) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |raw: String| {
        let parsed = parse(&raw);
        async move { parsed }.boxed()
    })
}

fn erase_parser<T: Send + Sync + 'static>(parse: ParseFn<T>) -> ParseFn<Value> {
    Arc::new(move |raw: String| {
        let parsed = parse(raw);
        async move { parsed.await.map(|value| Box::new(value) as Value) }.boxed()
    })
}

fn erase_default<T: Send + Sync + 'static>(default: DefaultFn<T>) -> DefaultFn<Value> {
    Arc::new(move || {
        let supplied = default();
        async move {
            supplied
                .await
                .map(|value| value.map(|value| Box::new(value) as Value))
        }
        .boxed()
    })
}

/// One positional argument slot
pub struct Argument {
    pub(crate) id: Option<usize>,
    name: Option<String>,
    description: Option<String>,
    required: bool,
    rest: bool,
    hidden: bool,
    parse: ParseFn<Value>,
    choices: Option<Choices>,
    default: Option<DefaultFn<Value>>,
}

impl Argument {
    /// Position within its `ArgumentList`, `None` until the list is built
    #[must_use]
    #[inline]
    pub const fn id(&self) -> Option<usize> {
        self.id
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    #[inline]
    pub const fn is_rest(&self) -> bool {
        self.rest
    }

    #[must_use]
    #[inline]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    #[inline]
    pub const fn choices(&self) -> Option<&Choices> {
        self.choices.as_ref()
    }

    #[must_use]
    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Upper-cased name, or `UNKNOWN ARGUMENT` for unnamed arguments
    #[must_use]
    #[inline]
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map_or_else(|| "UNKNOWN ARGUMENT".to_owned(), str::to_uppercase)
    }

    pub(crate) async fn parse(&self, raw: String) -> Result<Value> {
        (self.parse)(raw).await
    }

    pub(crate) async fn default_value(&self) -> Result<Option<Value>> {
        match &self.default {
            Some(supplier) => supplier().await,
            None => Ok(None),
        }
    }
}

/// Display form shared by usage text, help text and error messages:
/// `<NAME>` when required, `[<NAME>]` otherwise.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "<{}>", self.display_name())
        } else {
            write!(f, "[<{}>]", self.display_name())
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("required", &self.required)
            .field("rest", &self.rest)
            .field("hidden", &self.hidden)
            .field("choices", &self.choices)
            .field("has_default", &self.default.is_some())
            .finish_non_exhaustive()
    }
}

/// Family of plain string arguments
#[must_use]
#[inline]
pub fn string() -> ArgKind<String> {
    ArgKind::new(|raw| Ok(raw.to_owned()))
}

/// Family of arguments parsed through `FromStr`
#[must_use]
#[inline]
pub fn from_str<T>() -> ArgKind<T>
where
    T: FromStr + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    ArgKind::new(|raw: &str| {
        raw.parse::<T>()
            .map_err(|err| anyhow!("invalid value '{raw}': {err}"))
    })
}

/// Family of path arguments, a leading `~` expands to the home directory
///
/// The home directory is looked up on the real system at parse time, not
/// through the `System` an invocation runs against. Use [`path_with_home`]
/// when the home directory has to come from elsewhere, e.g. a `MockSystem`.
#[must_use]
#[inline]
pub fn path() -> ArgKind<PathBuf> {
    ArgKind::new(|raw| Ok(expand_home(raw, dirs::home_dir().as_deref())))
}

/// Family of path arguments expanding `~` to a fixed `home`
///
/// With `None`, paths are kept as written.
#[must_use]
#[inline]
pub fn path_with_home(home: Option<PathBuf>) -> ArgKind<PathBuf> {
    ArgKind::new(move |raw| Ok(expand_home(raw, home.as_deref())))
}

/// Required string argument
#[inline]
pub fn required<O: Into<ArgOptions<String>>>(options: O) -> Argument {
    string().required(options)
}

/// Optional string argument
#[inline]
pub fn optional<O: Into<ArgOptions<String>>>(options: O) -> Argument {
    string().optional(options)
}

/// Rest string argument
#[inline]
pub fn rest<O: Into<ArgOptions<String>>>(options: O) -> Argument {
    string().rest(options)
}
