//! Abstract operations
//!
//! Type conversion, comparison, the object protocol wrappers and the
//! iterator protocol. Operations that may run user code take the [`Realm`]
//! and return [`Result`]; pure numeric helpers live in [`number`] and
//! [`bigint`].
//!
//! [`Realm`]: crate::runtime::Realm
//! [`Result`]: crate::Result

pub mod bigint;
mod compare;
mod conversion;
mod iterator;
pub mod number;
pub(crate) mod object;

pub use bigint::{bigint_from_integral_f64, compare_bigint_number, string_to_bigint};
pub use compare::{
    abstract_equals, compare_utf16, greater_than, greater_than_or_equal, less_than,
    less_than_or_equal, relational_comparison, strict_equals,
};
pub use conversion::{
    canonical_numeric_index_string, is_array, is_callable, is_constructor, is_integer,
    is_property_key, ordinary_to_primitive, require_object_coercible, to_boolean, to_index,
    to_int16, to_int32, to_int8, to_integer, to_length, to_number, to_numeric, to_object,
    to_primitive, to_property_key, to_string, to_uint16, to_uint32, to_uint8, to_uint8_clamp,
    PreferredType,
};
pub use iterator::{
    create_iter_result_object, get_iterator, get_iterator_from_method, iterable_to_list,
    iterator_close, iterator_close_with_error, iterator_complete, iterator_next, iterator_step,
    iterator_value, IteratorRecord,
};
pub use number::{number_to_string, string_to_number};
pub use object::{
    call, complete_property_descriptor, construct, copy_data_properties,
    create_array_from_list, create_data_property, create_data_property_or_throw,
    create_list_from_array_like, create_method_property, define_property_or_throw,
    delete_property_or_throw, enumerable_own_properties, from_property_descriptor, get, get_method,
    get_v, has_own_property, has_property, has_property_value, instanceof_operator, invoke,
    is_extensible, ordinary_has_instance, set, set_integrity_level, species_constructor,
    test_integrity_level, to_property_descriptor, EnumerableKind, IntegrityLevel,
};

use crate::runtime::Value;

/// SameValue(x, y)
#[inline]
pub fn same_value(x: &Value, y: &Value) -> bool {
    x.same_value(y)
}

/// SameValueZero(x, y)
#[inline]
pub fn same_value_zero(x: &Value, y: &Value) -> bool {
    x.same_value_zero(y)
}
