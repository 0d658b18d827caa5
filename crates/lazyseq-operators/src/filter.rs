//! Streaming predicate stages: `filter` (where), `skip_while`, `take_while`.
//!
//! Each predicate runs once per source element, lazily, in source order.

use std::rc::Rc;

use lazyseq_core::dag::OpDescriptor;

use crate::sequence::Sequence;
use crate::traits::cursor_fn;

impl<T: 'static> Sequence<T> {
    /// Elements for which `predicate` holds.
    pub fn filter<F>(&self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        self.unary(OpDescriptor::Where, move || {
            let mut input = upstream.cursor();
            let predicate = Rc::clone(&predicate);
            cursor_fn(move || {
                while let Some(item) = input.try_next()? {
                    if predicate(&item) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }

    /// Drops elements until `predicate` first fails; from then on everything
    /// passes through without consulting the predicate again.
    pub fn skip_while<F>(&self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        self.unary(OpDescriptor::SkipWhile, move || {
            let mut input = upstream.cursor();
            let predicate = Rc::clone(&predicate);
            let mut skipping = true;
            cursor_fn(move || {
                while let Some(item) = input.try_next()? {
                    if skipping && predicate(&item) {
                        continue;
                    }
                    skipping = false;
                    return Ok(Some(item));
                }
                Ok(None)
            })
        })
    }

    /// Yields elements while `predicate` holds and stops for good at the
    /// first failure, even if later elements would pass.
    pub fn take_while<F>(&self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        self.unary(OpDescriptor::TakeWhile, move || {
            let mut input = upstream.cursor();
            let predicate = Rc::clone(&predicate);
            let mut done = false;
            cursor_fn(move || {
                if done {
                    return Ok(None);
                }
                match input.try_next()? {
                    Some(item) if predicate(&item) => Ok(Some(item)),
                    _ => {
                        done = true;
                        Ok(None)
                    }
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::sequence::Sequence;
    use crate::shared::Shared;

    fn names() -> Sequence<&'static str> {
        Sequence::from_vec(vec!["Tom", "Dick", "Harry", "Mary", "Jay"])
    }

    #[test]
    fn filter_keeps_matching_elements_in_order() {
        let long = names().filter(|x| x.len() >= 4);
        assert_eq!(long.to_vec().unwrap(), vec!["Dick", "Harry", "Mary"]);
    }

    #[test]
    fn chained_filters_compose() {
        let q = names().filter(|x| x.len() > 3).filter(|x| x.contains('a'));
        assert_eq!(q.to_vec().unwrap(), vec!["Harry", "Mary"]);
    }

    #[test]
    fn skip_while_and_take_while_switch_once() {
        assert_eq!(
            names().skip_while(|x| !x.contains('a')).to_vec().unwrap(),
            vec!["Harry", "Mary", "Jay"]
        );
        assert_eq!(
            names().take_while(|x| !x.contains('a')).to_vec().unwrap(),
            vec!["Tom", "Dick"]
        );
        // "Tom" would pass again after "Harry", but take_while already stopped.
        let again = Sequence::from_vec(vec!["Tom", "Harry", "Tom"]);
        assert_eq!(again.take_while(|x| x.len() == 3).to_vec().unwrap(), vec!["Tom"]);
    }

    #[test]
    fn predicate_is_not_called_before_the_first_pull() {
        let calls = Shared::new(0);
        let counter = calls.clone();
        let q = names().filter(move |_| {
            counter.update(|c| *c += 1);
            true
        });
        assert_eq!(calls.get(), 0);
        let mut it = q.iter();
        assert_eq!(calls.get(), 0);
        it.next();
        assert_eq!(calls.get(), 1);
    }
}
