//! Hostname templates
//!
//! Hostnames are rendered from a template compiled once at startup. The
//! template is restricted substitution over a fixed set of placeholders:
//!
//! - `<name>` - route name
//! - `<ns>` - route namespace
//! - `<router-name>` - ingress controller name
//! - `<router-domain>` - ingress controller domain
//!
//! Anything else inside angle brackets is rejected at compile time, so a
//! template that loads successfully always renders every placeholder.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while compiling a hostname template
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// Template string is empty
    #[error("template is empty")]
    Empty,
    /// Placeholder is not one of the supported variables
    #[error("unknown placeholder <{0}> (expected <name>, <ns>, <router-name> or <router-domain>)")]
    UnknownPlaceholder(String),
    /// A `<` has no matching `>`
    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),
}

/// Variables a hostname template may reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variable {
    /// Route name
    RouteName,
    /// Route namespace
    RouteNamespace,
    /// Ingress controller name
    RouterName,
    /// Ingress controller domain
    RouterDomain,
}

impl Variable {
    fn from_placeholder(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::RouteName),
            "ns" => Some(Self::RouteNamespace),
            "router-name" => Some(Self::RouterName),
            "router-domain" => Some(Self::RouterDomain),
            _ => None,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::RouteName => "name",
            Self::RouteNamespace => "ns",
            Self::RouterName => "router-name",
            Self::RouterDomain => "router-domain",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(Variable),
}

/// Values substituted into a hostname template
#[derive(Clone, Copy, Debug)]
pub struct HostnameVars<'a> {
    /// Route name
    pub route_name: &'a str,
    /// Route namespace
    pub route_namespace: &'a str,
    /// Ingress controller name
    pub router_name: &'a str,
    /// Ingress controller domain
    pub router_domain: &'a str,
}

impl HostnameVars<'_> {
    fn get(&self, var: Variable) -> &str {
        match var {
            Variable::RouteName => self.route_name,
            Variable::RouteNamespace => self.route_namespace,
            Variable::RouterName => self.router_name,
            Variable::RouterDomain => self.router_domain,
        }
    }
}

/// A compiled hostname template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostnameTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl HostnameTemplate {
    /// Default template: `<name>-<ns>.<router-domain>`
    pub const DEFAULT: &'static str = "<name>-<ns>.<router-domain>";

    /// Compile a template string
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the template is empty, contains an unknown
    /// placeholder, or has an unterminated `<`.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut offset = 0;
        let mut remaining = source;

        while let Some(start) = remaining.find('<') {
            literal.push_str(&remaining[..start]);
            let after = &remaining[start + 1..];
            let end = after
                .find('>')
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let name = &after[..end];
            let var = Variable::from_placeholder(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Var(var));

            let consumed = start + 1 + end + 1;
            offset += consumed;
            remaining = &remaining[consumed..];
        }

        literal.push_str(remaining);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template string this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the template references the given variable
    pub fn uses(&self, var: Variable) -> bool {
        self.segments.iter().any(|s| *s == Segment::Var(var))
    }

    /// Render the template with the given values
    pub fn render(&self, vars: &HostnameVars<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(var) => out.push_str(vars.get(*var)),
            }
        }
        out
    }
}

impl Default for HostnameTemplate {
    fn default() -> Self {
        Self {
            source: Self::DEFAULT.to_string(),
            segments: vec![
                Segment::Var(Variable::RouteName),
                Segment::Literal("-".to_string()),
                Segment::Var(Variable::RouteNamespace),
                Segment::Literal(".".to_string()),
                Segment::Var(Variable::RouterDomain),
            ],
        }
    }
}

impl FromStr for HostnameTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for HostnameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Var(var) => write!(f, "<{}>", var.placeholder())?,
            }
        }
        Ok(())
    }
}
