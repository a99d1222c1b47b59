// Builds the `ElementId` enum together with its id, payload type and name tables.
macro_rules! element_ids {
    ($($variant:ident = $id:literal => $kind:ident),* $(,)?) => {
        /// Matroska element ids the crate knows about.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ElementId {
            $($variant,)*
            /// Any id outside the schema table, kept as read.
            Unknown(u32),
        }

        impl ElementId {
            pub fn from_u32(id: u32) -> Self {
                match id {
                    $($id => ElementId::$variant,)*
                    other => ElementId::Unknown(other),
                }
            }

            pub fn as_u32(self) -> u32 {
                match self {
                    $(ElementId::$variant => $id,)*
                    ElementId::Unknown(id) => id,
                }
            }

            /// Payload type from the static schema; unknown ids are opaque binary.
            pub fn kind(self) -> ElementKind {
                match self {
                    $(ElementId::$variant => ElementKind::$kind,)*
                    ElementId::Unknown(_) => ElementKind::Binary,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(ElementId::$variant => stringify!($variant),)*
                    ElementId::Unknown(_) => "Unknown",
                }
            }
        }
    };
}
