// The faces themselves (sockets, local channels) belong to the forwarder.
// Tables and strategies only ever see the id and whether the face is local,
//  which is all the scope rules need.

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceScope {
    Local,
    NonLocal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Face {
    pub id: FaceId,
    pub scope: FaceScope,
}

impl Face {
    pub fn local(id: u32) -> Self {
        Self {
            id: FaceId(id),
            scope: FaceScope::Local,
        }
    }

    pub fn non_local(id: u32) -> Self {
        Self {
            id: FaceId(id),
            scope: FaceScope::NonLocal,
        }
    }

    pub fn is_local(&self) -> bool {
        self.scope == FaceScope::Local
    }
}
