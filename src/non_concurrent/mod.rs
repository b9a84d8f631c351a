pub mod rbtree;
