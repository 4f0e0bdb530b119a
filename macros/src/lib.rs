use proc_macro::TokenStream;

mod constituent;
use constituent::*;

derive_constituent_interface! {}
