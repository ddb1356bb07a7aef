//! Macros for declaring state-like enums.

/// Declare a fieldless enum together with its [`State`](crate::core::State)
/// implementation, a `Display` impl and an `ALL` constant listing every variant.
///
/// Each variant carries the label used by [`State::name`](crate::core::State::name)
/// and by serde.
///
/// # Example
///
/// ```
/// use transition_tree::core::State;
/// use transition_tree::state_enum;
///
/// state_enum! {
///     pub enum Visibility {
///         Shown => "shown",
///         Hidden => "hidden",
///         Removed => "removed",
///     }
///     final: [Removed]
/// }
///
/// assert_eq!(Visibility::Shown.name(), "shown");
/// assert!(Visibility::Removed.is_final());
/// assert_eq!(Visibility::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum Lamp {
            Off => "off",
            Warming => "warming",
            On => "on",
            Burnt => "burnt",
        }
        final: [On, Burnt]
        error: [Burnt]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(Lamp::Off.name(), "off");
        assert!(!Lamp::Off.is_final());
        assert!(!Lamp::Warming.is_error());

        assert!(Lamp::On.is_final());
        assert!(!Lamp::On.is_error());

        assert!(Lamp::Burnt.is_final());
        assert!(Lamp::Burnt.is_error());
    }

    #[test]
    fn state_enum_lists_all_variants() {
        assert_eq!(Lamp::ALL, &[Lamp::Off, Lamp::Warming, Lamp::On, Lamp::Burnt]);
    }

    #[test]
    fn state_enum_serializes_with_labels() {
        let json = serde_json::to_string(&Lamp::Warming).unwrap();
        assert_eq!(json, "\"warming\"");

        let back: Lamp = serde_json::from_str("\"burnt\"").unwrap();
        assert_eq!(back, Lamp::Burnt);
    }

    #[test]
    fn state_enum_displays_label() {
        assert_eq!(Lamp::On.to_string(), "on");
    }

    #[test]
    fn state_enum_works_without_final_error() {
        state_enum! {
            pub enum Minimal {
                One => "one",
                Two => "two",
            }
        }

        assert!(!Minimal::One.is_final());
        assert!(!Minimal::Two.is_error());
    }
}
