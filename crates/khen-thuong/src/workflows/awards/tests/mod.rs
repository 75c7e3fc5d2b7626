mod common;

mod duration;
