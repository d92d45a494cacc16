/// Generates a collection with syntactic sugar for vecs, sets and maps.
///
/// Works for [`Parameters`](crate::Parameters) as well as for the header maps
/// passed to [`Paginator::paginate`](crate::Paginator::paginate).
///
/// ## Example
///
/// ```
/// use std::collections::{BTreeMap, HashMap, HashSet};
/// use linkpager_rs::{collection, Parameters};
///
/// let s: Vec<_> = collection![1, 2, 3];
/// println!("{:?}", s);
/// let s: HashSet<_> = collection!{ 1, 2, 3 };
/// println!("{:?}", s);
/// let s: BTreeMap<_, _> = collection!{ 1 => 2, 3 => 4 };
/// println!("{:?}", s);
/// let headers: HashMap<&str, &str> = collection!{ "Accept" => "application/json" };
/// println!("{:?}", headers);
/// let params: Parameters = collection!{ "state" => "open" };
/// println!("{:?}", params);
/// ```
#[macro_export]
macro_rules! collection {
    ($($k:expr => $v:expr),* $(,)?) => {{
        core::convert::From::from([$(($k, $v),)*])
    }};
    ($($v:expr),* $(,)?) => {{
        core::convert::From::from([$($v,)*])
    }};
}
