//! Widget kinds
//!
//! [`WidgetKind`] is the closed runtime taxonomy; every variant also has an
//! uninhabited marker type of the same name implementing [`Kind`], which is
//! what [`Handle`](crate::Handle) is parameterized by.

use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// Compile-time widget kind
pub trait Kind: sealed::Sealed + 'static {
    /// Runtime counterpart of this marker
    const KIND: WidgetKind;
}

macro_rules! widget_kinds {
    ($( $(#[$doc:meta])* $name:ident => $tag:literal, )*) => {
        /// Closed set of widget kinds
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum WidgetKind {
            $( $(#[$doc])* $name, )*
        }

        impl WidgetKind {
            /// Every kind, in declaration order
            pub const ALL: &'static [WidgetKind] = &[$( WidgetKind::$name, )*];

            /// Host tag name, upper-case
            pub const fn tag_name(self) -> &'static str {
                match self {
                    $( WidgetKind::$name => $tag, )*
                }
            }

            /// Kind name as written in code
            pub const fn name(self) -> &'static str {
                match self {
                    $( WidgetKind::$name => stringify!($name), )*
                }
            }
        }

        $(
            $(#[$doc])*
            #[derive(Debug)]
            pub enum $name {}

            impl sealed::Sealed for $name {}

            impl Kind for $name {
                const KIND: WidgetKind = WidgetKind::$name;
            }
        )*
    };
}

widget_kinds! {
    /// Generic container
    Div => "DIV",
    /// Inline container
    Span => "SPAN",
    Paragraph => "P",
    Heading => "H1",
    Button => "BUTTON",
    /// Single-line text input
    Input => "INPUT",
    TextArea => "TEXTAREA",
    Label => "LABEL",
    /// Hyperlink
    Anchor => "A",
    Image => "IMG",
    /// Unordered list
    List => "UL",
    ListItem => "LI",
}

impl WidgetKind {
    /// Recover a kind from a host tag name (ASCII case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag_name().eq_ignore_ascii_case(tag))
    }

    /// Kinds users interact with directly
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Button | Self::Input | Self::TextArea | Self::Anchor)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
