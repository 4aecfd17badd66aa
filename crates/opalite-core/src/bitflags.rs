// Copyright 2025 opalite contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A macro to define typed bitflag sets in a structured way.

/// Defines a typed set of bitflags backed by an integer type.
///
/// The generated type is `Copy`, hashable, defaults to the empty set, and
/// supports the usual set operations plus a readable `Debug` rendering of
/// the contained flag names.
#[macro_export]
macro_rules! opalite_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// An empty set of flags.
            pub const EMPTY: Self = Self { bits: 0 };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Creates a flag set from raw bits. Unknown bits are kept.
            pub const fn from_bits(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw value of the flag set.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Returns `true` if no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if all flags in `other` are contained in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if any flag in `other` is contained in `self`.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Inserts the flags in `other` into `self`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Removes the flags in `other` from `self`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Returns a new set with the flags in `other` added.
            #[must_use]
            pub const fn with(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }

            /// Returns a new set with the flags in `other` removed.
            #[must_use]
            pub const fn without(self, other: Self) -> Self {
                Self { bits: self.bits & !other.bits }
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, other: Self) {
                self.bits &= other.bits;
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut remaining = self.bits;
                let mut first = true;

                write!(f, "{}(", stringify!($name))?;
                $(
                    if $flag_value != 0 && (self.bits & $flag_value) == $flag_value {
                        if !first {
                            write!(f, " | ")?;
                        }
                        write!(f, "{}", stringify!($flag_name))?;
                        remaining &= !$flag_value;
                        first = false;
                    }
                )*
                if remaining != 0 {
                    if !first {
                        write!(f, " | ")?;
                    }
                    write!(f, "{remaining:#x}")?;
                    first = false;
                }
                if first {
                    write!(f, "EMPTY")?;
                }
                write!(f, ")")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    opalite_bitflags! {
        struct TestFlags: u8 {
            const A = 1 << 0;
            const B = 1 << 1;
            const C = 1 << 2;
        }
    }

    #[test]
    fn set_operations() {
        let mut flags = TestFlags::A | TestFlags::C;
        assert!(flags.contains(TestFlags::A));
        assert!(!flags.contains(TestFlags::B));
        assert!(flags.intersects(TestFlags::B | TestFlags::C));

        flags.insert(TestFlags::B);
        assert!(flags.contains(TestFlags::A | TestFlags::B | TestFlags::C));

        flags.remove(TestFlags::A);
        assert!(!flags.contains(TestFlags::A));
        assert_eq!(flags.bits(), 0b110);
    }

    #[test]
    fn with_and_without_are_pure() {
        let flags = TestFlags::A;
        assert_eq!(flags.with(TestFlags::B).bits(), 0b011);
        assert_eq!(flags.bits(), 0b001);
        assert_eq!(flags.with(TestFlags::B).without(TestFlags::A).bits(), 0b010);
    }

    #[test]
    fn debug_lists_flag_names() {
        let flags = TestFlags::A | TestFlags::C;
        assert_eq!(format!("{flags:?}"), "TestFlags(A | C)");
        assert_eq!(format!("{:?}", TestFlags::EMPTY), "TestFlags(EMPTY)");
        assert_eq!(format!("{:?}", TestFlags::from_bits(0b1001)), "TestFlags(A | 0x8)");
    }

    #[test]
    fn default_is_empty() {
        assert!(TestFlags::default().is_empty());
    }
}
