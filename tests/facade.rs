use std::str::Chars;

use rbtree_facade::facade::{
    Cursor, DefaultSentinel, DerefMode, Done, Facade, Forward, IteratorKind, Offset, RandomAccess,
    Readout, Retreat, SinglePass, Value,
};

/// Letters of a string, read once.
struct Letters<'s> {
    rest: Chars<'s>,
    current: Option<char>,
}

impl<'s> Letters<'s> {
    fn new(s: &'s str) -> Self {
        let mut rest = s.chars();
        let current = rest.next();
        Self { rest, current }
    }
}

impl Cursor for Letters<'_> {
    type Tier = SinglePass;
    type Reference<'r> = Value<char> where Self: 'r;

    fn read(&self) -> Value<char> {
        match self.current {
            Some(c) => Value(c),
            None => panic!("read past the last letter"),
        }
    }
    fn next(&mut self) {
        self.current = self.rest.next();
    }
}

impl Done for Letters<'_> {
    fn done(&self) -> bool {
        self.current.is_none()
    }
}

/// Fibonacci numbers; two cursors are equal when they hold the same pair.
#[derive(Clone, Copy, PartialEq, Debug)]
struct Fib {
    a: u64,
    b: u64,
}

impl Cursor for Fib {
    type Tier = Forward;
    type Reference<'r> = Value<u64>;

    fn read(&self) -> Value<u64> {
        Value(self.a)
    }
    fn next(&mut self) {
        (self.a, self.b) = (self.b, self.a + self.b);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

/// Points on the diagonal, computed on the fly.
#[derive(Clone, Copy, PartialEq)]
struct Diagonal(i32);

impl Cursor for Diagonal {
    type Tier = RandomAccess;
    type Reference<'r> = Value<Point>;

    fn read(&self) -> Value<Point> {
        Value(Point { x: self.0, y: self.0 })
    }
    fn next(&mut self) {
        self.0 += 1;
    }
}

impl Retreat for Diagonal {
    fn prev(&mut self) {
        self.0 -= 1;
    }
}

impl Offset for Diagonal {
    fn distance_to(&self, other: &Self) -> isize {
        (other.0 - self.0) as isize
    }
    fn advance(&mut self, n: isize) {
        self.0 += n as i32;
    }
    fn read_at(&self, n: isize) -> Value<Point> {
        let i = self.0 + n as i32;
        Value(Point { x: i, y: i })
    }
}

/// Borrowed words, random access.
#[derive(Clone, Copy)]
struct Words<'s> {
    words: &'s [&'s str],
    idx: usize,
}

impl PartialEq for Words<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.words, other.words) && self.idx == other.idx
    }
}

impl<'s> Cursor for Words<'s> {
    type Tier = RandomAccess;
    type Reference<'r> = &'s &'s str where Self: 'r;

    fn read(&self) -> &'s &'s str {
        &self.words[self.idx]
    }
    fn next(&mut self) {
        self.idx += 1;
    }
}

impl Retreat for Words<'_> {
    fn prev(&mut self) {
        self.idx -= 1;
    }
}

impl<'s> Offset for Words<'s> {
    fn distance_to(&self, other: &Self) -> isize {
        other.idx as isize - self.idx as isize
    }
    fn advance(&mut self, n: isize) {
        self.idx = self.idx.wrapping_add_signed(n);
    }
    fn read_at(&self, n: isize) -> &'s &'s str {
        &self.words[self.idx.wrapping_add_signed(n)]
    }
}

/// First position in `[first, last)` for which `below` is false.
fn lower_bound<C, F>(mut first: Facade<C>, last: Facade<C>, mut below: F) -> Facade<C>
where
    C: Offset + Clone,
    F: FnMut(&Facade<C>) -> bool,
{
    let mut count = last - first.clone();
    while count > 0 {
        let step = count / 2;
        let mid = first.clone() + step;
        if below(&mid) {
            first = mid + 1;
            count -= step + 1;
        } else {
            count = step;
        }
    }
    first
}

#[test]
fn single_pass_runs_until_the_sentinel() {
    assert_eq!(Facade::<Letters<'_>>::KIND, IteratorKind::SinglePass);
    let mut it = Facade::new(Letters::new("tree"));
    let mut out = String::new();
    while it != DefaultSentinel {
        out.push(it.get().into_inner());
        it.inc();
    }
    assert_eq!(out, "tree");

    let empty = Facade::new(Letters::new(""));
    assert!(DefaultSentinel == empty);
}

#[test]
fn forward_iterators_compare_by_position() {
    assert_eq!(Facade::<Fib>::KIND, IteratorKind::Forward);
    let begin = Facade::new(Fib { a: 0, b: 1 });
    let mut end = begin;
    for _ in 0..10 {
        end.inc();
    }

    let mut it = begin;
    let mut seen = vec![];
    while it != end {
        seen.push(*it.arrow());
        it.inc();
    }
    assert_eq!(seen, [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);

    // a copy walks the same sequence again
    let mut again = begin;
    again.inc();
    assert_eq!(again.post_inc().get().into_inner(), 1);
    assert_eq!(again.get().into_inner(), 1);
}

#[test]
fn by_value_readouts_go_through_the_proxy() {
    assert_eq!(<Value<Point> as Readout>::MODE, DerefMode::Value);
    assert_eq!(<&i32 as Readout>::MODE, DerefMode::Reference);

    let it = Facade::new(Diagonal(4));
    assert_eq!(it.arrow().x, 4);
    assert_eq!(it.arrow().y, 4);
    assert_eq!(it.arrow().into_inner(), Point { x: 4, y: 4 });
    assert_eq!(it.at(-2).into_inner(), Point { x: 2, y: 2 });
}

#[test]
fn random_access_algorithms() {
    assert_eq!(Facade::<Diagonal>::KIND, IteratorKind::RandomAccess);
    let a = Facade::new(Diagonal(0));
    let b = a + 7;
    assert_eq!(b - a, 7);
    assert_eq!(a - b, -7);
    assert_eq!(a.distance(&b), 7);
    assert!(a < b);
    assert!(b >= a);
    assert!(a + 7 == b);

    let words = ["apple", "fig", "kiwi", "lemon", "mango", "pear"];
    let first = Facade::new(Words { words: &words, idx: 0 });
    let last = first + words.len() as isize;
    let found = lower_bound(first, last, |it| *it.get() < "l");
    assert_eq!(*found.get(), "lemon");
    assert_eq!(found - first, 3);
    assert_eq!(*found.at(-1), "kiwi");

    let none = lower_bound(first, last, |_| true);
    assert!(none == last);
}

#[test]
fn decrement_mirrors_increment() {
    let mut it = Facade::new(Diagonal(0));
    it.inc().inc().dec();
    assert_eq!(it.arrow().x, 1);
    let old = it.post_dec();
    assert_eq!(old.arrow().x, 1);
    assert_eq!(it.arrow().x, 0);

    let mut jump = it;
    jump += 5;
    jump -= 2;
    assert_eq!(jump - it, 3);
    assert_eq!((jump - 3).arrow().x, 0);
    assert_eq!((2 + jump).arrow().x, 5);
}
