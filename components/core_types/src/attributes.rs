//! Property attribute flags.

use bitflags::bitflags;

bitflags! {
    /// Attributes of an object property.
    ///
    /// Data properties carry the classic {writable, enumerable,
    /// configurable} triple. Accessor properties additionally set the
    /// `HAS_GETTER`/`HAS_SETTER` markers so the shape records which side
    /// of the accessor is present without consulting the slot value.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::PropertyAttributes;
    ///
    /// let attrs = PropertyAttributes::default();
    /// assert!(attrs.is_writable());
    /// assert!(attrs.is_enumerable());
    /// assert!(attrs.is_configurable());
    ///
    /// let frozen = PropertyAttributes::empty();
    /// assert!(!frozen.is_writable());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyAttributes: u8 {
        /// The property value may be changed with an ordinary write.
        const WRITABLE = 1 << 0;
        /// The property shows up during enumeration.
        const ENUMERABLE = 1 << 1;
        /// The property may be deleted or have its attributes changed.
        const CONFIGURABLE = 1 << 2;
        /// The property is an accessor with a getter.
        const HAS_GETTER = 1 << 3;
        /// The property is an accessor with a setter.
        const HAS_SETTER = 1 << 4;
    }
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        PropertyAttributes::WRITABLE
            | PropertyAttributes::ENUMERABLE
            | PropertyAttributes::CONFIGURABLE
    }
}

impl PropertyAttributes {
    /// True if ordinary writes may change the property value.
    pub fn is_writable(self) -> bool {
        self.contains(PropertyAttributes::WRITABLE)
    }

    /// True if the property shows up during enumeration.
    pub fn is_enumerable(self) -> bool {
        self.contains(PropertyAttributes::ENUMERABLE)
    }

    /// True if the property may be deleted or reconfigured.
    pub fn is_configurable(self) -> bool {
        self.contains(PropertyAttributes::CONFIGURABLE)
    }

    /// True if the property is an accessor property.
    pub fn is_accessor(self) -> bool {
        self.intersects(PropertyAttributes::HAS_GETTER | PropertyAttributes::HAS_SETTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attributes() {
        let attrs = PropertyAttributes::default();
        assert!(attrs.is_writable());
        assert!(attrs.is_enumerable());
        assert!(attrs.is_configurable());
        assert!(!attrs.is_accessor());
    }

    #[test]
    fn test_empty_attributes() {
        let attrs = PropertyAttributes::empty();
        assert!(!attrs.is_writable());
        assert!(!attrs.is_enumerable());
        assert!(!attrs.is_configurable());
    }

    #[test]
    fn test_accessor_markers() {
        let getter_only = PropertyAttributes::HAS_GETTER | PropertyAttributes::CONFIGURABLE;
        assert!(getter_only.is_accessor());
        assert!(!getter_only.is_writable());
    }
}
