//! Projection stages: `select`, `select_indexed`, and the flattening
//! `select_many` family (which also expresses unconditional cross joins).

use std::rc::Rc;

use lazyseq_core::dag::OpDescriptor;

use crate::sequence::{IntoSequence, Sequence};
use crate::traits::{cursor_fn, BoxCursor};

impl<T: 'static> Sequence<T> {
    /// 1:1 projection.
    pub fn select<U, F>(&self, projector: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let upstream = self.clone();
        let projector = Rc::new(projector);
        let mapped = self.unary(OpDescriptor::Select, move || {
            let mut input = upstream.cursor();
            let projector = Rc::clone(&projector);
            cursor_fn(move || Ok(input.try_next()?.map(|item| projector(item))))
        });
        self.count_into(mapped)
    }

    /// 1:1 projection that also receives the 0-based position. The counter
    /// restarts with every enumeration.
    pub fn select_indexed<U, F>(&self, projector: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T, usize) -> U + 'static,
    {
        let upstream = self.clone();
        let projector = Rc::new(projector);
        let mapped = self.unary(OpDescriptor::SelectIndexed, move || {
            let mut input = upstream.cursor();
            let projector = Rc::clone(&projector);
            let mut index = 0usize;
            cursor_fn(move || {
                let Some(item) = input.try_next()? else {
                    return Ok(None);
                };
                let out = projector(item, index);
                index += 1;
                Ok(Some(out))
            })
        });
        self.count_into(mapped)
    }

    /// Flattens each element into zero or more sub-elements, in order.
    pub fn select_many<U, I, F>(&self, selector: F) -> Sequence<U>
    where
        U: 'static,
        I: IntoSequence<U>,
        F: Fn(T) -> I + 'static,
    {
        let upstream = self.clone();
        let selector = Rc::new(selector);
        self.unary(OpDescriptor::SelectMany { projected: false }, move || {
            let mut input = upstream.cursor();
            let selector = Rc::clone(&selector);
            let mut inner: Option<BoxCursor<U>> = None;
            cursor_fn(move || loop {
                if let Some(sub) = inner.as_mut() {
                    if let Some(item) = sub.try_next()? {
                        return Ok(Some(item));
                    }
                    inner = None;
                }
                match input.try_next()? {
                    Some(outer) => inner = Some(selector(outer).into_sequence().cursor()),
                    None => return Ok(None),
                }
            })
        })
    }

    /// Flattening with a result selector that sees both the outer element
    /// and each sub-element. When `selector` ignores its input and returns a
    /// fixed second sequence, this is a cross join: every left × right pair,
    /// row-major with the left side as the outer loop.
    pub fn select_many_with<U, I, R, F, G>(&self, selector: F, result: G) -> Sequence<R>
    where
        U: 'static,
        R: 'static,
        I: IntoSequence<U>,
        F: Fn(&T) -> I + 'static,
        G: Fn(&T, U) -> R + 'static,
    {
        let upstream = self.clone();
        let selector = Rc::new(selector);
        let result = Rc::new(result);
        self.unary(OpDescriptor::SelectMany { projected: true }, move || {
            let mut input = upstream.cursor();
            let selector = Rc::clone(&selector);
            let result = Rc::clone(&result);
            let mut inner: Option<(T, BoxCursor<U>)> = None;
            cursor_fn(move || loop {
                if let Some((outer, sub)) = inner.as_mut() {
                    if let Some(item) = sub.try_next()? {
                        return Ok(Some(result(outer, item)));
                    }
                    inner = None;
                }
                match input.try_next()? {
                    Some(outer) => {
                        let sub = selector(&outer).into_sequence().cursor();
                        inner = Some((outer, sub));
                    }
                    None => return Ok(None),
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::sequence::Sequence;

    #[test]
    fn select_projects_each_element() {
        let names = Sequence::from_vec(vec!["Tom", "Dick", "Harry"]);
        let initials = names.select(|x| x.chars().next().unwrap_or(' '));
        assert_eq!(initials.to_vec().unwrap(), vec!['T', 'D', 'H']);
    }

    #[test]
    fn select_indexed_restarts_per_enumeration() {
        let names = Sequence::from_vec(vec!["Tom", "Dick"]);
        let q = names.select_indexed(|x, i| format!("{i}:{x}"));
        assert_eq!(q.to_vec().unwrap(), vec!["0:Tom", "1:Dick"]);
        assert_eq!(q.to_vec().unwrap(), vec!["0:Tom", "1:Dick"]);
    }

    #[test]
    fn select_many_flattens_and_skips_empty_children() {
        let nested = Sequence::from_vec(vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(nested.select_many(|v| v).to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn cross_join_is_row_major() {
        let left = Sequence::from_vec(vec!["France", "Germany"]);
        let right = Sequence::from_vec(vec!["China", "UAE"]);
        let pairs = left.select_many_with(move |_| right.clone(), |a, b| format!("{a} vs. {b}"));
        assert_eq!(
            pairs.to_vec().unwrap(),
            vec![
                "France vs. China",
                "France vs. UAE",
                "Germany vs. China",
                "Germany vs. UAE"
            ]
        );
    }
}
